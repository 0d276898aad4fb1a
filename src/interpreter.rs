use crate::ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
use crate::error::{BasicError, ErrorKind, Span};
use crate::value::Value;
use std::collections::HashMap;

/// Flat variable store: one namespace for the whole program, loop and
/// conditional bodies included. First assignment creates the binding.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).copied()
    }
}

/// Tree-walking interpreter: executes statements for effect and evaluates
/// expressions for value against one Environment created fresh per run.
pub struct Interpreter {
    environment: Environment,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn interpret(&mut self, program: &Program) -> Result<(), BasicError> {
        for statement in &program.statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), BasicError> {
        match stmt {
            Stmt::Let { name, expr, .. } => {
                let value = self.evaluate_expression(expr)?;
                self.environment.define(name, value);
                Ok(())
            }
            Stmt::Print { expr, .. } => {
                let value = self.evaluate_expression(expr)?;
                println!("{}", value);
                Ok(())
            }
            Stmt::If {
                condition, body, ..
            } => {
                // Condition checked exactly once; there is no else branch.
                if self.evaluate_expression(condition)?.is_truthy() {
                    for statement in body {
                        self.execute_statement(statement)?;
                    }
                }
                Ok(())
            }
            Stmt::DoWhile {
                condition, body, ..
            } => {
                while self.evaluate_expression(condition)?.is_truthy() {
                    for statement in body {
                        self.execute_statement(statement)?;
                    }
                }
                Ok(())
            }
            Stmt::End { .. } => Ok(()),
        }
    }

    pub fn evaluate_expression(&self, expr: &Expr) -> Result<Value, BasicError> {
        match expr {
            Expr::Literal { value, .. } => Ok(*value),
            Expr::Variable { name, span } => self.environment.get(name).ok_or_else(|| {
                BasicError::new(
                    ErrorKind::UndefinedVariable,
                    *span,
                    format!("Undefined variable '{}'", name),
                )
            }),
            Expr::Unary {
                operator,
                operand,
                span,
            } => {
                let value = self.evaluate_expression(operand)?;
                self.evaluate_unary_op(*operator, value, *span)
            }
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left_value = self.evaluate_expression(left)?;
                let right_value = self.evaluate_expression(right)?;
                self.evaluate_binary_op(*operator, left_value, right_value, *span)
            }
            Expr::Grouping { expr, .. } => self.evaluate_expression(expr),
        }
    }

    fn evaluate_binary_op(
        &self,
        operator: BinaryOp,
        left: Value,
        right: Value,
        span: Span,
    ) -> Result<Value, BasicError> {
        match operator {
            BinaryOp::Add => match (left, right) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Int(l + r)),
                (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l + r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 + r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l + r as f64)),
                (l, r) => Err(illegal_operator("add", l, r, span)),
            },
            BinaryOp::Subtract => match (left, right) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Int(l - r)),
                (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l - r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 - r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l - r as f64)),
                (l, r) => Err(illegal_operator("subtract", l, r, span)),
            },
            BinaryOp::Multiply => match (left, right) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Int(l * r)),
                (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l * r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 * r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l * r as f64)),
                (l, r) => Err(illegal_operator("multiply", l, r, span)),
            },
            // Division always produces a true quotient, never truncating.
            BinaryOp::Divide => match (left, right) {
                (Value::Int(l), Value::Int(r)) => {
                    if r == 0 {
                        Err(division_by_zero(span))
                    } else {
                        Ok(Value::Float(l as f64 / r as f64))
                    }
                }
                (Value::Float(l), Value::Float(r)) => {
                    if r == 0.0 {
                        Err(division_by_zero(span))
                    } else {
                        Ok(Value::Float(l / r))
                    }
                }
                (Value::Int(l), Value::Float(r)) => {
                    if r == 0.0 {
                        Err(division_by_zero(span))
                    } else {
                        Ok(Value::Float(l as f64 / r))
                    }
                }
                (Value::Float(l), Value::Int(r)) => {
                    if r == 0 {
                        Err(division_by_zero(span))
                    } else {
                        Ok(Value::Float(l / r as f64))
                    }
                }
                (l, r) => Err(illegal_operator("divide", l, r, span)),
            },
            BinaryOp::Equal => match (left, right) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l == r)),
                (Value::Float(l), Value::Float(r)) => Ok(Value::Bool(l == r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Bool((l as f64) == r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Bool(l == (r as f64))),
                (l, r) => Err(illegal_operator("compare", l, r, span)),
            },
            BinaryOp::Less => match (left, right) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l < r)),
                (Value::Float(l), Value::Float(r)) => Ok(Value::Bool(l < r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Bool((l as f64) < r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Bool(l < (r as f64))),
                (l, r) => Err(illegal_operator("compare", l, r, span)),
            },
            BinaryOp::Greater => match (left, right) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l > r)),
                (Value::Float(l), Value::Float(r)) => Ok(Value::Bool(l > r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Bool((l as f64) > r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Bool(l > (r as f64))),
                (l, r) => Err(illegal_operator("compare", l, r, span)),
            },
            BinaryOp::NotGreater => match (left, right) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l <= r)),
                (Value::Float(l), Value::Float(r)) => Ok(Value::Bool(l <= r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Bool((l as f64) <= r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Bool(l <= (r as f64))),
                (l, r) => Err(illegal_operator("compare", l, r, span)),
            },
            BinaryOp::NotLess => match (left, right) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l >= r)),
                (Value::Float(l), Value::Float(r)) => Ok(Value::Bool(l >= r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Bool((l as f64) >= r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Bool(l >= (r as f64))),
                (l, r) => Err(illegal_operator("compare", l, r, span)),
            },
        }
    }

    fn evaluate_unary_op(
        &self,
        operator: UnaryOp,
        operand: Value,
        span: Span,
    ) -> Result<Value, BasicError> {
        match operator {
            UnaryOp::Negate => match operand {
                Value::Int(n) => Ok(Value::Int(-n)),
                Value::Float(n) => Ok(Value::Float(-n)),
                Value::Bool(_) => Err(BasicError::new(
                    ErrorKind::IllegalOperator,
                    span,
                    format!("Cannot negate {}", operand.type_name()),
                )),
            },
            UnaryOp::Plus => match operand {
                Value::Int(_) | Value::Float(_) => Ok(operand),
                Value::Bool(_) => Err(BasicError::new(
                    ErrorKind::IllegalOperator,
                    span,
                    format!("Cannot apply unary '+' to {}", operand.type_name()),
                )),
            },
        }
    }
}

fn illegal_operator(verb: &str, left: Value, right: Value, span: Span) -> BasicError {
    BasicError::new(
        ErrorKind::IllegalOperator,
        span,
        format!(
            "Cannot {} {} and {}",
            verb,
            left.type_name(),
            right.type_name()
        ),
    )
}

fn division_by_zero(span: Span) -> BasicError {
    BasicError::new(
        ErrorKind::DivisionByZero,
        span,
        "Division by zero".to_string(),
    )
}
