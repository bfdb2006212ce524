use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use nilo_diagnostics::{DiagnosticSink, Emitter};
use nilo_driver::{InterpreterConfig, NiloError, DEFAULT_MAX_DEPTH};
use std::fs;

#[derive(Parser)]
#[command(name = "nilo")]
#[command(about = "Nilo 解释器 - None 合并与短路访问", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 关闭彩色输出
    #[arg(long, global = true)]
    no_color: bool,

    /// 日志详细程度 (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// 最大求值深度
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 Nilo 源文件
    Run {
        /// 输入文件
        input: String,
    },

    /// 只检查语法错误
    Check {
        /// 输入文件
        input: String,
    },

    /// 求值单个表达式并打印结果
    Eval {
        /// 表达式
        expr: String,
    },

    /// 打印完全加括号的 AST
    Ast {
        /// 输入文件
        input: String,

        /// 输出文件 (默认: 标准输出)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }
    let emitter = if cli.no_color {
        Emitter::without_colors()
    } else {
        Emitter::new()
    };
    let config = InterpreterConfig::default().with_max_depth(cli.max_depth);

    match cli.command {
        Commands::Run { input } => cmd_run(&input, config, &emitter)?,
        Commands::Check { input } => cmd_check(&input, &emitter)?,
        Commands::Eval { expr } => cmd_eval(&expr, config, &emitter),
        Commands::Ast { input, output } => cmd_ast(&input, output.as_deref(), &emitter)?,
    }

    Ok(())
}

/// RUST_LOG 优先，否则按 -v 次数选择级别
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// 输出诊断并以状态码 1 退出
fn fail(err: NiloError, emitter: &Emitter, file: Option<&str>, source: Option<&str>) -> ! {
    err.emit(emitter, file, source);
    std::process::exit(1);
}

/// 运行命令
fn cmd_run(input: &str, config: InterpreterConfig, emitter: &Emitter) -> Result<()> {
    let source = fs::read_to_string(input)?;
    log::info!("running {}", input);

    if let Err(e) = nilo_driver::run_source(&source, config) {
        fail(e, emitter, Some(input), Some(&source));
    }
    Ok(())
}

/// 检查命令
fn cmd_check(input: &str, emitter: &Emitter) -> Result<()> {
    let source = fs::read_to_string(input)?;
    println!("🔍 检查 {} ...", input);

    match nilo_driver::check(&source) {
        Ok(output) => {
            let mut sink = DiagnosticSink::new();
            sink.extend(output.warnings.into_iter().map(|w| w.with_file(input)));
            eprint!("{}", sink.render_all(emitter, Some(&source)));
            println!(
                "{} {} 条语句，{} 个警告",
                "✅".green(),
                output.statements,
                sink.warning_count()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", "❌ 发现错误:".red());
            fail(e, emitter, Some(input), Some(&source));
        }
    }
}

/// 求值命令：打印结果的 repr
fn cmd_eval(expr: &str, config: InterpreterConfig, emitter: &Emitter) {
    match nilo_driver::eval_expression(expr, config) {
        Ok(value) => println!("{}", value.repr()),
        Err(e) => fail(e, emitter, None, Some(expr)),
    }
}

/// AST 命令
fn cmd_ast(input: &str, output: Option<&str>, emitter: &Emitter) -> Result<()> {
    let source = fs::read_to_string(input)?;

    let ast = match nilo_driver::dump_ast(&source) {
        Ok(ast) => ast,
        Err(e) => fail(e, emitter, Some(input), Some(&source)),
    };

    match output {
        Some(path) => {
            fs::write(path, ast)?;
            println!("✅ 成功生成 {}", path);
        }
        None => print!("{}", ast),
    }
    Ok(())
}
