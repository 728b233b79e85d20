// Execution engine for theme and render snippets

use std::rc::Rc;

use crate::interpreter::builtins::Capabilities;
use crate::interpreter::constants::DEFAULT_MAX_CALL_DEPTH;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::scope::Scope;
use crate::parser::ast::*;
use crate::value::{Callable, Closure, Element, Node, Value};

/// Result of executing a statement list
#[derive(Debug, Clone)]
pub(crate) enum Completion {
    Normal,
    Return(Value),
}

/// Scopes created by one active closure call
#[derive(Default)]
struct CallFrame {
    scopes: Vec<Rc<Scope>>,

    /// A closure created in this call was assigned to a binding outside it
    escaped: bool,
}

impl CallFrame {
    fn owns(&self, scope: &Scope) -> bool {
        self.scopes.iter().any(|own| scope.descends_from(own))
    }

    /// Whether `value` holds a closure that captured one of this call's scopes
    fn is_captured_by(&self, value: &Value) -> bool {
        let mut pending = vec![value];
        while let Some(value) = pending.pop() {
            match value {
                Value::Function(callable) => match callable.as_ref() {
                    Callable::Closure(closure) => {
                        if self.owns(&closure.scope) {
                            return true;
                        }
                    }
                    // Bound methods may hold anything
                    Callable::Native(_) => return true,
                },
                Value::Array(items) => pending.extend(items.iter()),
                Value::Object(map) => pending.extend(map.values()),
                Value::Element(element) => {
                    pending.extend(element.props.values());
                    let mut nodes: Vec<&Element> = vec![element.as_ref()];
                    while let Some(node) = nodes.pop() {
                        for child in &node.children {
                            if let Node::Element(child) = child {
                                pending.extend(child.props.values());
                                nodes.push(child.as_ref());
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        false
    }
}

/// Tree-walking interpreter for one evaluation or one call into evaluated code
pub struct Interpreter {
    /// Names visible to snippets besides their own bindings
    capabilities: Rc<Capabilities>,

    /// Current number of active calls
    depth: usize,

    /// Calls nested deeper than this fail with `CallDepthExceeded`
    max_call_depth: usize,

    /// Current expression nesting, across calls
    pub(crate) nesting: usize,

    /// One entry per active closure call, innermost last
    frames: Vec<CallFrame>,
}

impl Interpreter {
    pub fn new(capabilities: Rc<Capabilities>) -> Self {
        Interpreter {
            capabilities,
            depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            nesting: 0,
            frames: Vec::new(),
        }
    }

    pub fn with_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Evaluate a parsed snippet in a fresh top-level scope
    pub fn run(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        let scope = Scope::root();
        self.evaluate_expr(expr, &scope)
    }

    /// Resolve a name through the scope chain, then the capability set
    pub(crate) fn lookup(
        &self,
        name: &str,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        scope
            .lookup(name)
            .or_else(|| self.capabilities.get(name).cloned())
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            })
    }

    /// Call a function value with already-evaluated arguments
    pub fn call(
        &mut self,
        callee: &Value,
        args: &[Value],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let callable = match callee {
            Value::Function(callable) => callable.clone(),
            other => {
                return Err(RuntimeError::NotCallable {
                    callee: describe_callee(other),
                    location,
                })
            }
        };

        if self.depth >= self.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.max_call_depth,
                location,
            });
        }

        self.depth += 1;
        let result = match callable.as_ref() {
            Callable::Native(native) => (native.func)(self, args, location),
            Callable::Closure(closure) => {
                self.frames.push(CallFrame::default());
                let result = self.call_closure(callee, closure, args);
                if let Some(frame) = self.frames.pop() {
                    self.release_frame(frame, &result);
                }
                result
            }
        };
        self.depth -= 1;

        result
    }

    /// Child scope registered with the innermost call
    pub(crate) fn child_scope(&mut self, parent: &Rc<Scope>) -> Rc<Scope> {
        let scope = Scope::child(parent);
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.push(scope.clone());
        }
        scope
    }

    /// Break the cycles between a finished call's scopes and the closures
    /// bound in them. Scopes still reachable from outside move to the
    /// enclosing call, which makes the same decision when it returns.
    fn release_frame(&mut self, frame: CallFrame, result: &Result<Value, RuntimeError>) {
        let escaped = frame.escaped
            || matches!(result, Ok(value) if frame.is_captured_by(value));
        if !escaped {
            for scope in &frame.scopes {
                scope.clear();
            }
            return;
        }
        if let Some(parent) = self.frames.last_mut() {
            parent.scopes.extend(frame.scopes);
        }
    }

    /// Note an assignment of `value` to the binding of `name` found from
    /// `scope`, so a closure stored outside its call keeps its scopes
    pub(crate) fn note_assignment(&mut self, scope: &Rc<Scope>, name: &str, value: &Value) {
        let Some(owner) = scope.defining_scope(name) else {
            return;
        };
        for frame in self.frames.iter_mut().rev() {
            if frame.owns(&owner) {
                break;
            }
            if frame.is_captured_by(value) {
                frame.escaped = true;
            }
        }
    }

    /// `new F(args)`: only constructible natives (such as `Error`) qualify
    pub(crate) fn construct(
        &mut self,
        callee: &Value,
        args: &[Value],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(callable) => match callable.as_ref() {
                Callable::Native(native) if native.constructible => {
                    self.call(callee, args, location)
                }
                _ => Err(RuntimeError::NotConstructible {
                    callee: callable.name().to_string(),
                    location,
                }),
            },
            other => Err(RuntimeError::NotConstructible {
                callee: describe_callee(other),
                location,
            }),
        }
    }

    fn call_closure(
        &mut self,
        callee: &Value,
        closure: &Closure,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let function = &closure.function;

        // A named function expression can refer to itself
        let outer = match &function.name {
            Some(name) => {
                let named = self.child_scope(&closure.scope);
                named.declare(name, callee.clone(), false);
                named
            }
            None => closure.scope.clone(),
        };
        let scope = self.child_scope(&outer);

        for (index, param) in function.params.iter().enumerate() {
            let arg = args.get(index).cloned().unwrap_or_default();
            self.bind_element(param, arg, &scope, true, function.location)?;
        }

        if let Some(rest) = &function.rest {
            let extra = args.get(function.params.len()..).unwrap_or_default().to_vec();
            self.declare(&scope, rest, Value::array(extra), true, function.location)?;
        }

        match &function.body {
            FunctionBody::Expr(expr) => self.evaluate_expr(expr, &scope),
            FunctionBody::Block(body) => match self.execute_block(body, &scope)? {
                Completion::Return(value) => Ok(value),
                Completion::Normal => Ok(Value::Undefined),
            },
        }
    }

    /// Bind one name in `scope`, rejecting duplicates
    pub(crate) fn declare(
        &self,
        scope: &Rc<Scope>,
        name: &str,
        value: Value,
        mutable: bool,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if scope.declare(name, value, mutable) {
            Ok(())
        } else {
            Err(RuntimeError::Redeclaration {
                name: name.to_string(),
                location,
            })
        }
    }
}

/// Name used in "x is not a function" messages
fn describe_callee(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Function(callable) => callable.name().to_string(),
        other => other.type_of().to_string(),
    }
}
