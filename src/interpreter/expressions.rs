//! Expression evaluation implementation
//!
//! This module handles evaluation of all snippet expression types, including:
//!
//! - Literals (numbers, strings, templates, arrays, objects)
//! - Identifiers, resolved through local scopes and then capabilities
//! - Member access, indexing and calls, with optional chaining
//! - Unary, binary, logical and conditional operators
//! - Assignment to local `let` bindings
//!
//! # Optional Chaining
//!
//! A chain such as `a?.b.c()` is evaluated by [`Interpreter::evaluate_chain`],
//! which returns `None` once a `?.` link meets `null` or `undefined`. The
//! whole chain then evaluates to `undefined` without touching later links.

use std::rc::Rc;

use crate::interpreter::constants::MAX_EVAL_DEPTH;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::ops::{check_array_length, check_string_length};
use crate::interpreter::scope::{Assignment, Scope};
use crate::parser::ast::*;
use crate::value::{Callable, Closure, Object, Value};

impl Interpreter {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate_expr(
        &mut self,
        expr: &Expr,
        scope: &Rc<Scope>,
    ) -> Result<Value, RuntimeError> {
        if self.nesting >= MAX_EVAL_DEPTH {
            return Err(RuntimeError::NestingTooDeep {
                limit: MAX_EVAL_DEPTH,
                location: expr.location(),
            });
        }
        self.nesting += 1;
        let result = self.evaluate_expr_inner(expr, scope);
        self.nesting -= 1;
        result
    }

    fn evaluate_expr_inner(
        &mut self,
        expr: &Expr,
        scope: &Rc<Scope>,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Number(n, _) => Ok(Value::Number(*n)),

            Expr::Str(s, _) => Ok(Value::from(s.as_str())),

            Expr::Template(parts, location) => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => out.push_str(text),
                        TemplatePart::Expr(expr) => {
                            out.push_str(&self.evaluate_expr(expr, scope)?.to_display_string())
                        }
                    }
                    check_string_length(out.len(), *location)?;
                }
                Ok(Value::from(out))
            }

            Expr::Bool(b, _) => Ok(Value::Bool(*b)),

            Expr::Null(_) => Ok(Value::Null),

            Expr::Undefined(_) => Ok(Value::Undefined),

            Expr::Ident(name, loc) => self.lookup(name, scope, *loc),

            Expr::Array(entries, _) => Ok(Value::array(self.evaluate_list(entries, scope)?)),

            Expr::Object(members, _) => self.evaluate_object(members, scope),

            Expr::Function(function) => Ok(Value::Function(Rc::new(Callable::Closure(
                Closure {
                    function: function.clone(),
                    scope: scope.clone(),
                },
            )))),

            Expr::Member { .. } | Expr::Index { .. } | Expr::Call { .. } => {
                Ok(self.evaluate_chain(expr, scope)?.unwrap_or_default())
            }

            Expr::New {
                callee,
                args,
                location,
            } => {
                let constructor = self.evaluate_expr(callee, scope)?;
                let args = self.evaluate_list(args, scope)?;
                self.construct(&constructor, &args, *location)
                    .map_err(|err| match err {
                        RuntimeError::NotConstructible { location, .. } => {
                            RuntimeError::NotConstructible {
                                callee: describe_expr(callee),
                                location,
                            }
                        }
                        other => other,
                    })
            }

            Expr::Unary {
                op,
                operand,
                location,
            } => self.evaluate_unary_op(*op, operand, scope, *location),

            Expr::Binary {
                op,
                left,
                right,
                location,
            } => {
                let left = self.evaluate_expr(left, scope)?;
                let right = self.evaluate_expr(right, scope)?;
                self.evaluate_binary_op(*op, &left, &right, *location)
            }

            Expr::Logical {
                op, left, right, ..
            } => {
                let left = self.evaluate_expr(left, scope)?;
                let short_circuit = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate_expr(right, scope)
                }
            }

            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                if self.evaluate_expr(condition, scope)?.is_truthy() {
                    self.evaluate_expr(then_expr, scope)
                } else {
                    self.evaluate_expr(else_expr, scope)
                }
            }

            Expr::Assign {
                target,
                op,
                value,
                location,
            } => self.evaluate_assign(target, *op, value, scope, *location),
        }
    }

    /// Evaluate a member/index/call chain; `None` means an optional link
    /// short-circuited
    fn evaluate_chain(
        &mut self,
        expr: &Expr,
        scope: &Rc<Scope>,
    ) -> Result<Option<Value>, RuntimeError> {
        match expr {
            Expr::Member {
                object,
                property,
                optional,
                location,
            } => {
                let Some(target) = self.evaluate_link(object, scope)? else {
                    return Ok(None);
                };
                if *optional && target.is_nullish() {
                    return Ok(None);
                }
                self.get_property(&target, property, *location).map(Some)
            }

            Expr::Index {
                object,
                index,
                optional,
                location,
            } => {
                let Some(target) = self.evaluate_link(object, scope)? else {
                    return Ok(None);
                };
                if *optional && target.is_nullish() {
                    return Ok(None);
                }
                let key = self.evaluate_expr(index, scope)?.to_property_key();
                self.get_property(&target, &key, *location).map(Some)
            }

            Expr::Call {
                callee,
                args,
                optional,
                location,
            } => {
                let Some(function) = self.evaluate_link(callee, scope)? else {
                    return Ok(None);
                };
                if *optional && function.is_nullish() {
                    return Ok(None);
                }
                if !function.is_callable() {
                    return Err(RuntimeError::NotCallable {
                        callee: describe_expr(callee),
                        location: *location,
                    });
                }
                let args = self.evaluate_list(args, scope)?;
                self.call(&function, &args, *location).map(Some)
            }

            other => self.evaluate_expr(other, scope).map(Some),
        }
    }

    fn evaluate_link(
        &mut self,
        expr: &Expr,
        scope: &Rc<Scope>,
    ) -> Result<Option<Value>, RuntimeError> {
        match expr {
            Expr::Member { .. } | Expr::Index { .. } | Expr::Call { .. } => {
                self.evaluate_chain(expr, scope)
            }
            other => self.evaluate_expr(other, scope).map(Some),
        }
    }

    /// Evaluate array elements or call arguments, expanding spreads
    pub(crate) fn evaluate_list(
        &mut self,
        entries: &[ListEntry],
        scope: &Rc<Scope>,
    ) -> Result<Vec<Value>, RuntimeError> {
        let mut values = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                ListEntry::Item(expr) => values.push(self.evaluate_expr(expr, scope)?),
                ListEntry::Spread(expr) => {
                    let spread = self.evaluate_expr(expr, scope)?;
                    match spread {
                        Value::Array(items) => {
                            check_array_length(values.len() + items.len(), expr.location())?;
                            values.extend(items.iter().cloned())
                        }
                        Value::String(s) => {
                            check_array_length(values.len() + s.len(), expr.location())?;
                            values.extend(s.chars().map(|c| Value::from(c.to_string())))
                        }
                        _ => {
                            return Err(RuntimeError::type_error(
                                format!("{} is not iterable", describe_expr(expr)),
                                expr.location(),
                            ))
                        }
                    }
                }
            }
        }
        Ok(values)
    }

    fn evaluate_object(
        &mut self,
        members: &[ObjectMember],
        scope: &Rc<Scope>,
    ) -> Result<Value, RuntimeError> {
        let mut map = Object::with_capacity(members.len());
        for member in members {
            match member {
                ObjectMember::Property { key, value } => {
                    let key = self.property_key(key, scope)?;
                    let value = self.evaluate_expr(value, scope)?;
                    map.insert(key, value);
                }
                ObjectMember::Spread(expr) => match self.evaluate_expr(expr, scope)? {
                    Value::Object(source) => {
                        for (key, value) in source.iter() {
                            map.insert(key.clone(), value.clone());
                        }
                    }
                    Value::Array(items) => {
                        for (index, value) in items.iter().enumerate() {
                            map.insert(index.to_string(), value.clone());
                        }
                    }
                    Value::String(s) => {
                        for (index, c) in s.chars().enumerate() {
                            map.insert(index.to_string(), Value::from(c.to_string()));
                        }
                    }
                    // Spreading primitives, functions or nullish values adds nothing
                    _ => {}
                },
            }
        }
        Ok(Value::object(map))
    }

    fn evaluate_assign(
        &mut self,
        target: &str,
        op: AssignOp,
        value: &Expr,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let new_value = match op {
            AssignOp::Assign => self.evaluate_expr(value, scope)?,
            AssignOp::AddAssign | AssignOp::SubAssign => {
                let current = self.lookup(target, scope, location)?;
                let rhs = self.evaluate_expr(value, scope)?;
                let bin_op = if op == AssignOp::AddAssign {
                    BinOp::Add
                } else {
                    BinOp::Sub
                };
                self.evaluate_binary_op(bin_op, &current, &rhs, location)?
            }
        };

        match scope.assign(target, new_value.clone()) {
            Assignment::Assigned => {
                self.note_assignment(scope, target, &new_value);
                Ok(new_value)
            }
            Assignment::Immutable => Err(RuntimeError::ConstAssignment {
                name: target.to_string(),
                location,
            }),
            Assignment::Unbound if self.capabilities().get(target).is_some() => {
                Err(RuntimeError::ReadOnlyCapability {
                    name: target.to_string(),
                    location,
                })
            }
            Assignment::Unbound => Err(RuntimeError::UndefinedVariable {
                name: target.to_string(),
                location,
            }),
        }
    }
}

/// Source-like description of an expression for error messages
pub(crate) fn describe_expr(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name, _) => name.clone(),
        Expr::Member {
            object, property, ..
        } => format!("{}.{}", describe_expr(object), property),
        Expr::Index { object, .. } => format!("{}[...]", describe_expr(object)),
        Expr::Call { callee, .. } => format!("{}(...)", describe_expr(callee)),
        Expr::Str(s, _) => format!("\"{}\"", s),
        Expr::Number(n, _) => format_number(*n),
        Expr::Null(_) => "null".to_string(),
        Expr::Undefined(_) => "undefined".to_string(),
        _ => "expression".to_string(),
    }
}
