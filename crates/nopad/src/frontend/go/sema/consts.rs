//! Integer constant evaluation for array lengths

use super::resolver::ResolveError;
use super::scope::PackageScope;
use super::stdlib;
use crate::common::{LintError, Span};
use crate::frontend::go::ast::{BinOp, ConstExpr, ConstExprKind, UnaryOp};

type EvalResult = Result<i128, ResolveError>;

/// Evaluates constant expressions against a package scope
pub struct ConstEvaluator<'s, 'a> {
    scope: &'s PackageScope<'a>,
    /// Constants whose value is being computed, for cycle detection
    evaluating: Vec<String>,
}

impl<'s, 'a> ConstEvaluator<'s, 'a> {
    pub fn new(scope: &'s PackageScope<'a>) -> Self {
        Self {
            scope,
            evaluating: Vec::new(),
        }
    }

    /// Evaluate `expr` as written in `file`; `iota` is set inside `const` declarations
    pub fn eval(&mut self, expr: &'a ConstExpr, file: usize, iota: Option<u64>) -> EvalResult {
        match &expr.kind {
            ConstExprKind::Int(value) => Ok(*value),
            ConstExprKind::Iota => iota.map(i128::from).ok_or_else(|| {
                LintError::semantic("cannot use iota outside constant declaration", expr.span).into()
            }),
            ConstExprKind::Name { package: None, name } => self.eval_name(name, expr.span),
            ConstExprKind::Name {
                package: Some(package),
                name,
            } => {
                let path = self.scope.import_path(file, package).ok_or_else(|| {
                    ResolveError::from(LintError::semantic(format!("undefined: {}", package), expr.span))
                })?;
                stdlib::package_const(path, name).ok_or_else(|| ResolveError::Unknown {
                    name: format!("{}.{}", package, name),
                    span: expr.span,
                })
            }
            ConstExprKind::Convert(operand) => self.eval(operand, file, iota),
            ConstExprKind::Unary { op, operand } => {
                let value = self.eval(operand, file, iota)?;
                match op {
                    UnaryOp::Plus => Ok(value),
                    UnaryOp::Neg => value.checked_neg().ok_or_else(|| overflow(expr.span)),
                    UnaryOp::Complement => Ok(!value),
                    UnaryOp::Not => Err(not_integer(expr.span)),
                }
            }
            ConstExprKind::Binary { op, lhs, rhs } => {
                if *op == BinOp::Logical {
                    return Err(not_integer(expr.span));
                }
                let lhs = self.eval(lhs, file, iota)?;
                let rhs = self.eval(rhs, file, iota)?;
                binary(*op, lhs, rhs, expr.span)
            }
            ConstExprKind::Other => Err(not_integer(expr.span)),
        }
    }

    fn eval_name(&mut self, name: &str, span: Span) -> EvalResult {
        let Some(symbol) = self.scope.lookup_const(name) else {
            let message = if self.scope.lookup_type(name).is_some() {
                format!("{} (type) is not an expression", name)
            } else {
                format!("undefined: {}", name)
            };
            return Err(LintError::semantic(message, span).into());
        };

        let Some(value) = symbol.value else {
            return Err(LintError::semantic(format!("missing init expr for {}", name), symbol.span).into());
        };

        if self.evaluating.iter().any(|n| *n == name) {
            return Err(LintError::type_error(format!("initialization cycle: {} refers to itself", name), span).into());
        }

        self.evaluating.push(name.to_string());
        let result = self.eval(value, symbol.file, Some(symbol.iota));
        self.evaluating.pop();
        result
    }
}

fn binary(op: BinOp, lhs: i128, rhs: i128, span: Span) -> EvalResult {
    let value = match op {
        BinOp::Add => lhs.checked_add(rhs),
        BinOp::Sub => lhs.checked_sub(rhs),
        BinOp::Mul => lhs.checked_mul(rhs),
        BinOp::Div | BinOp::Rem if rhs == 0 => {
            return Err(LintError::type_error("division by zero", span).into());
        }
        BinOp::Div => lhs.checked_div(rhs),
        BinOp::Rem => lhs.checked_rem(rhs),
        BinOp::Shl => u32::try_from(rhs)
            .ok()
            .filter(|&shift| shift < 127)
            .and_then(|shift| lhs.checked_shl(shift).filter(|v| v >> shift == lhs)),
        BinOp::Shr => match u32::try_from(rhs) {
            Ok(shift) => Some(lhs >> shift.min(127)),
            Err(_) => None,
        },
        BinOp::And => Some(lhs & rhs),
        BinOp::Or => Some(lhs | rhs),
        BinOp::Xor => Some(lhs ^ rhs),
        BinOp::AndNot => Some(lhs & !rhs),
        BinOp::Logical => return Err(not_integer(span)),
    };
    value.ok_or_else(|| overflow(span))
}

fn overflow(span: Span) -> ResolveError {
    LintError::type_error("constant overflow", span).into()
}

fn not_integer(span: Span) -> ResolveError {
    LintError::type_error("not an integer constant", span).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::go::ast::SourceFile;
    use crate::frontend::go::parser::Parser;
    use pretty_assertions::assert_eq;

    fn file(source: &str) -> Vec<SourceFile> {
        vec![Parser::new(source).parse_file().unwrap()]
    }

    fn value_of(files: &[SourceFile], name: &str) -> EvalResult {
        let (scope, errors) = PackageScope::build(files);
        assert!(errors.is_empty());
        let spec = files[0]
            .consts
            .iter()
            .find(|c| c.names.iter().any(|(n, _)| n == name))
            .unwrap();
        let index = spec.names.iter().position(|(n, _)| n == name).unwrap();
        ConstEvaluator::new(&scope).eval(&spec.values[index], 0, Some(spec.iota))
    }

    #[test]
    fn test_iota_groups() {
        let files = file("package p\nconst (\n\tA = iota\n\tB\n\tC = 1 << iota\n\tD\n)\n");
        assert_eq!(value_of(&files, "A").unwrap(), 0);
        assert_eq!(value_of(&files, "B").unwrap(), 1);
        assert_eq!(value_of(&files, "C").unwrap(), 4);
        assert_eq!(value_of(&files, "D").unwrap(), 8);
    }

    #[test]
    fn test_references_and_operators() {
        let files = file(
            "package p\nimport \"math\"\nconst Size = 2 * (Base + 1) &^ 1\nconst Base = 0x10 - 'a' + 97\nconst Big = math.MaxUint8 % 7\nconst Neg = -Base\n",
        );
        assert_eq!(value_of(&files, "Base").unwrap(), 16);
        assert_eq!(value_of(&files, "Size").unwrap(), 34);
        assert_eq!(value_of(&files, "Big").unwrap(), 3);
        assert_eq!(value_of(&files, "Neg").unwrap(), -16);
    }

    #[test]
    fn test_cycle_is_a_type_error() {
        let files = file("package p\nconst A = B + 1\nconst B = A\n");
        let err = value_of(&files, "A").unwrap_err();
        assert!(matches!(err, ResolveError::Invalid(LintError::Type { .. })));
    }

    #[test]
    fn test_non_integer_and_unknown() {
        let files = file("package p\nimport \"os\"\nconst S = \"x\"\nconst F = 1 / 0\nconst O = os.ModeDir\n");
        assert!(matches!(value_of(&files, "S"), Err(ResolveError::Invalid(_))));
        assert!(matches!(value_of(&files, "F"), Err(ResolveError::Invalid(LintError::Type { message, .. })) if message == "division by zero"));
        assert!(matches!(value_of(&files, "O"), Err(ResolveError::Unknown { .. })));
    }

    #[test]
    fn test_shift_overflow() {
        let span = Span::default();
        assert_eq!(binary(BinOp::Shl, 1, 10, span).unwrap(), 1024);
        assert!(binary(BinOp::Shl, 1, 200, span).is_err());
        assert_eq!(binary(BinOp::Shr, -8, 1, span).unwrap(), -4);
    }
}
