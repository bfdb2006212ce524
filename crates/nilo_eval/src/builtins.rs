//! 内置函数：print, len, object, str, repr, type

use crate::error::{RuntimeError, RuntimeResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

/// print 的输出目标：标准输出，或测试时的缓冲区
#[derive(Debug, Default)]
pub struct Output {
    captured: Option<String>,
}

impl Output {
    pub fn capture(&mut self) {
        self.captured.get_or_insert_with(String::new);
    }

    pub fn take(&mut self) -> String {
        self.captured.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub fn write_line(&mut self, line: &str) {
        match &mut self.captured {
            Some(buf) => {
                buf.push_str(line);
                buf.push('\n');
            }
            None => println!("{}", line),
        }
    }
}

fn expect_args<'a, const N: usize>(name: &str, args: &'a [Value]) -> RuntimeResult<&'a [Value; N]> {
    args.try_into().map_err(|_| {
        RuntimeError::type_error(format!(
            "{}() takes exactly {} argument{} ({} given)",
            name,
            N,
            if N == 1 { "" } else { "s" },
            args.len()
        ))
    })
}

/// 注册全部内置函数
pub(crate) fn install(interp: &mut Interpreter) {
    let marker = interp.marker().clone();
    let output = interp.output_handle();
    interp.define_fn("print", move |args| {
        let line = args
            .iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        output.borrow_mut().write_line(&line);
        Ok(marker.clone())
    });

    interp.define_fn("len", |args| {
        let [arg] = expect_args::<1>("len", args)?;
        let len = match arg {
            Value::Str(s) => s.chars().count(),
            Value::List(items) => items.borrow().len(),
            Value::Dict(dict) => dict.borrow().len(),
            other => {
                return Err(RuntimeError::type_error(format!(
                    "object of type '{}' has no len()",
                    other.type_name()
                )))
            }
        };
        Ok(Value::Int(len as i64))
    });

    interp.define_fn("object", |args| {
        expect_args::<0>("object", args)?;
        Ok(Value::object())
    });

    interp.define_fn("str", |args| {
        let [arg] = expect_args::<1>("str", args)?;
        Ok(Value::str(arg.to_string()))
    });

    interp.define_fn("repr", |args| {
        let [arg] = expect_args::<1>("repr", args)?;
        Ok(Value::str(arg.repr()))
    });

    interp.define_fn("type", |args| {
        let [arg] = expect_args::<1>("type", args)?;
        Ok(Value::str(arg.type_name()))
    });
}
