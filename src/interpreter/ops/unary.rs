//! Unary operator evaluation

use std::rc::Rc;

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::scope::Scope;
use crate::parser::ast::*;
use crate::value::Value;

impl Interpreter {
    pub(crate) fn evaluate_unary_op(
        &mut self,
        op: UnOp,
        operand: &Expr,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        use UnOp::*;

        // typeof tolerates names that are not defined anywhere
        if op == Typeof {
            if let Expr::Ident(name, _) = operand {
                return Ok(match self.lookup(name, scope, location) {
                    Ok(value) => Value::from(value.type_of()),
                    Err(_) => Value::from("undefined"),
                });
            }
        }

        let value = self.evaluate_expr(operand, scope)?;
        Ok(match op {
            Neg => Value::Number(-value.to_number()),
            Plus => Value::Number(value.to_number()),
            Not => Value::Bool(!value.is_truthy()),
            Typeof => Value::from(value.type_of()),
            Void => Value::Undefined,
        })
    }
}
