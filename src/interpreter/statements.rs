//! Statement execution and destructuring
//!
//! Statements only occur in block-bodied functions. Control flow is limited
//! to `if`/`else`, `return` and `throw`; there are no loops, so every call
//! terminates or hits the call depth limit.

use std::rc::Rc;

use crate::interpreter::engine::{Completion, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::scope::Scope;
use crate::parser::ast::*;
use crate::value::{Object, Value};

impl Interpreter {
    /// Execute statements in `scope` until one returns
    pub(crate) fn execute_block(
        &mut self,
        body: &[Stmt],
        scope: &Rc<Scope>,
    ) -> Result<Completion, RuntimeError> {
        for stmt in body {
            if let Completion::Return(value) = self.execute_statement(stmt, scope)? {
                return Ok(Completion::Return(value));
            }
        }
        Ok(Completion::Normal)
    }

    fn execute_statement(
        &mut self,
        stmt: &Stmt,
        scope: &Rc<Scope>,
    ) -> Result<Completion, RuntimeError> {
        match stmt {
            Stmt::Declare {
                kind,
                pattern,
                init,
                location,
            } => {
                let value = match init {
                    Some(expr) => self.evaluate_expr(expr, scope)?,
                    None => Value::Undefined,
                };
                self.bind_pattern(pattern, value, scope, *kind == DeclKind::Let, *location)?;
                Ok(Completion::Normal)
            }

            Stmt::Expression { expr, .. } => {
                self.evaluate_expr(expr, scope)?;
                Ok(Completion::Normal)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let branch = if self.evaluate_expr(condition, scope)?.is_truthy() {
                    then_branch
                } else if let Some(else_branch) = else_branch {
                    else_branch
                } else {
                    return Ok(Completion::Normal);
                };
                let block = self.child_scope(scope);
                self.execute_block(branch, &block)
            }

            Stmt::Return { expr, .. } => {
                let value = match expr {
                    Some(expr) => self.evaluate_expr(expr, scope)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }

            Stmt::Throw { expr, location } => {
                let value = self.evaluate_expr(expr, scope)?;
                Err(RuntimeError::Thrown {
                    message: thrown_message(&value),
                    location: *location,
                })
            }

            Stmt::Block { body, .. } => {
                let block = self.child_scope(scope);
                self.execute_block(body, &block)
            }
        }
    }

    /// Bind a parameter or array element, applying its default when the
    /// incoming value is `undefined`
    pub(crate) fn bind_element(
        &mut self,
        element: &PatternElement,
        value: Value,
        scope: &Rc<Scope>,
        mutable: bool,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let value = self.apply_default(value, element.default.as_ref(), scope)?;
        self.bind_pattern(&element.target, value, scope, mutable, location)
    }

    /// Destructure `value` into the names of `pattern`
    pub(crate) fn bind_pattern(
        &mut self,
        pattern: &Pattern,
        value: Value,
        scope: &Rc<Scope>,
        mutable: bool,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match pattern {
            Pattern::Ident(name) => self.declare(scope, name, value, mutable, location),

            Pattern::Object { properties, rest } => {
                if value.is_nullish() {
                    return Err(RuntimeError::type_error(
                        format!("Cannot destructure '{}' as it is {}.", value.to_display_string(), value.type_of()),
                        location,
                    ));
                }

                let mut used = Vec::with_capacity(properties.len());
                for property in properties {
                    let key = self.property_key(&property.key, scope)?;
                    let field = self.get_property(&value, &key, location)?;
                    let field = self.apply_default(field, property.default.as_ref(), scope)?;
                    self.bind_pattern(&property.target, field, scope, mutable, location)?;
                    used.push(key);
                }

                if let Some(rest) = rest {
                    let mut remaining = Object::new();
                    if let Value::Object(map) = &value {
                        for (key, field) in map.iter() {
                            if !used.contains(key) {
                                remaining.insert(key.clone(), field.clone());
                            }
                        }
                    }
                    self.declare(scope, rest, Value::object(remaining), mutable, location)?;
                }
                Ok(())
            }

            Pattern::Array { elements, rest } => {
                let items = match &value {
                    Value::Array(items) => items.clone(),
                    other => {
                        return Err(RuntimeError::type_error(
                            format!("{} is not iterable", other.type_of()),
                            location,
                        ))
                    }
                };

                for (index, element) in elements.iter().enumerate() {
                    if let Some(element) = element {
                        let item = items.get(index).cloned().unwrap_or_default();
                        self.bind_element(element, item, scope, mutable, location)?;
                    }
                }

                if let Some(rest) = rest {
                    let tail = items.get(elements.len()..).unwrap_or_default().to_vec();
                    self.declare(scope, rest, Value::array(tail), mutable, location)?;
                }
                Ok(())
            }
        }
    }

    fn apply_default(
        &mut self,
        value: Value,
        default: Option<&Expr>,
        scope: &Rc<Scope>,
    ) -> Result<Value, RuntimeError> {
        match (value, default) {
            (Value::Undefined, Some(default)) => self.evaluate_expr(default, scope),
            (value, _) => Ok(value),
        }
    }

    /// Resolve a named or computed property key
    pub(crate) fn property_key(
        &mut self,
        key: &PropertyKey,
        scope: &Rc<Scope>,
    ) -> Result<String, RuntimeError> {
        match key {
            PropertyKey::Named(name) => Ok(name.clone()),
            PropertyKey::Computed(expr) => {
                Ok(self.evaluate_expr(expr, scope)?.to_property_key())
            }
        }
    }
}

/// Message for an uncaught `throw`: the `message` of an error object,
/// otherwise the thrown value as text
fn thrown_message(value: &Value) -> String {
    match value
        .as_object()
        .and_then(|map| map.get("message"))
        .and_then(Value::as_str)
    {
        Some(message) => message.to_string(),
        None => value.to_display_string(),
    }
}
