//! 赋值、增量赋值与 `??` / `??=`

use super::chain::Chained;
use super::{access, ops, Interpreter};
use crate::error::{RuntimeError, RuntimeResult};
use crate::value::Value;
use nilo_syntax::ast::{AssignOp, AssignTarget, Expr, Span};

/// 已求值的赋值位置：对象和下标只求值一次，读写共用
enum Place {
    Name(String),
    Attribute(Value, String),
    Index(Value, Value),
}

impl Interpreter {
    /// `left ?? right`：left 不是 None 时 right 不求值
    pub(super) fn eval_coalesce(&mut self, left: &Expr, right: &Expr) -> RuntimeResult<Value> {
        let value = self.eval(left)?;
        if self.is_absent(&value) {
            log::trace!("left of '??' at {:?} is None, evaluating fallback", left.span);
            self.eval(right)
        } else {
            Ok(value)
        }
    }

    /// 求值目标的对象和下标；对象链被短路时返回 `None`，下标不再求值
    fn resolve(&mut self, target: &AssignTarget) -> RuntimeResult<Option<Place>> {
        Ok(match target {
            AssignTarget::Name { name, .. } => Some(Place::Name(name.clone())),
            AssignTarget::Attribute { object, name, .. } => self
                .target_object(object)?
                .map(|object| Place::Attribute(object, name.clone())),
            AssignTarget::Index { object, index, .. } => match self.target_object(object)? {
                Some(object) => Some(Place::Index(object, self.eval(index)?)),
                None => None,
            },
        })
    }

    fn target_object(&mut self, object: &Expr) -> RuntimeResult<Option<Value>> {
        match self.eval_target_object(object)? {
            Chained::Complete(value) => Ok(Some(value)),
            Chained::Suppressed => {
                log::trace!("target object {} suppressed, skipping store", object);
                Ok(None)
            }
        }
    }

    fn load(&self, place: &Place) -> RuntimeResult<Value> {
        match place {
            Place::Name(name) => self
                .globals
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::name_error(name)),
            Place::Attribute(object, name) => access::get_attribute(object, name),
            Place::Index(object, index) => access::get_item(object, index),
        }
    }

    fn store(&mut self, place: Place, value: Value) -> RuntimeResult<()> {
        match place {
            Place::Name(name) => {
                self.globals.insert(name, value);
                Ok(())
            }
            Place::Attribute(object, name) => access::set_attribute(&object, &name, value),
            Place::Index(object, index) => access::set_item(&object, &index, value),
        }
    }

    /// `target = value`：先求值右侧，再求值目标
    pub(super) fn exec_assign(&mut self, target: &AssignTarget, value: &Expr) -> RuntimeResult<()> {
        let value = self.eval(value)?;
        match self.resolve(target)? {
            Some(place) => self.store(place, value).map_err(|e| e.at(target.span())),
            None => Ok(()),
        }
    }

    /// `target op= value`
    ///
    /// `??=` 在目标当前值不是 None 时直接返回，右侧不求值。
    /// 目标的对象链被短路时整条语句什么都不做，右侧同样不求值。
    pub(super) fn exec_aug_assign(
        &mut self,
        target: &AssignTarget,
        op: AssignOp,
        value: &Expr,
        span: &Span,
    ) -> RuntimeResult<()> {
        let Some(place) = self.resolve(target)? else {
            return Ok(());
        };
        let current = self.load(&place).map_err(|e| e.at(target.span()))?;

        let updated = match op {
            AssignOp::Coalesce => {
                if !self.is_absent(&current) {
                    log::trace!("'??=' target {} already bound, skipping", target);
                    return Ok(());
                }
                self.eval(value)?
            }
            AssignOp::Arith(bin) => {
                let rhs = self.eval(value)?;
                ops::binary(bin, &current, &rhs).map_err(|e| e.at(span))?
            }
            AssignOp::Pow => {
                let rhs = self.eval(value)?;
                ops::power(&current, &rhs).map_err(|e| e.at(span))?
            }
        };

        self.store(place, updated).map_err(|e| e.at(target.span()))
    }
}
