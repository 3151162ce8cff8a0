//! Type resolution: Go type expressions to layout type descriptions
//!
//! Named types are followed to their underlying type. Only by-value
//! containment is resolved recursively; pointers, slices, maps, channels
//! and functions are fixed-size references, so nothing behind them is
//! inspected and recursion through them is legal.

use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use nopad_layout::{Field, MachineModel, TypeKind, checked_actual_size};

use super::consts::ConstEvaluator;
use super::scope::{PackageScope, TypeSymbol};
use super::stdlib;
use crate::common::{LintError, Span};
use crate::frontend::go::ast::{GoType, GoTypeKind, StructType};

/// Why a type could not be resolved
#[derive(Debug)]
pub enum ResolveError {
    /// Depends on something outside the package and the known standard
    /// library types; the struct is skipped
    Unknown { name: String, span: Span },
    /// The source itself is wrong
    Invalid(LintError),
}

impl From<LintError> for ResolveError {
    fn from(err: LintError) -> Self {
        Self::Invalid(err)
    }
}

type ResolveResult<T> = Result<T, ResolveError>;

/// A type argument, resolved lazily in the scope it was written in
#[derive(Clone)]
struct Binding<'a> {
    ty: &'a GoType,
    env: Rc<Env<'a>>,
}

/// Where a type expression appears
struct Env<'a> {
    file: usize,
    /// Type parameters in scope; unbound ones resolve to their constraint
    params: HashMap<&'a str, Option<Binding<'a>>>,
    /// Names that are neither declared in the package nor predeclared may
    /// still be function-local types or type parameters
    local: bool,
}

impl<'a> Env<'a> {
    fn new(file: usize, params: &'a [String], local: bool) -> Self {
        Self {
            file,
            params: params.iter().map(|p| (p.as_str(), None)).collect(),
            local,
        }
    }
}

/// Resolves struct types of one package for a target machine
pub struct Resolver<'s, 'a> {
    scope: &'s PackageScope<'a>,
    model: MachineModel,
    /// Non-generic named types already resolved
    cache: HashMap<&'a str, TypeKind>,
    /// Named types being resolved by value
    resolving: Vec<&'a str>,
}

impl<'s, 'a> Resolver<'s, 'a> {
    pub fn new(scope: &'s PackageScope<'a>, model: MachineModel) -> Self {
        Self {
            scope,
            model,
            cache: HashMap::new(),
            resolving: Vec::new(),
        }
    }

    /// Resolve the fields of a struct type literal.
    ///
    /// `name` is the declared type when the literal is the whole of a type
    /// declaration, `params` the type parameters in scope, and `local` marks
    /// literals inside function bodies and signatures.
    pub fn resolve_struct(
        &mut self,
        st: &'a StructType,
        file: usize,
        name: Option<&'a str>,
        params: &'a [String],
        local: bool,
    ) -> ResolveResult<Vec<Field>> {
        let env = Env::new(file, params, local);
        if let Some(name) = name {
            self.resolving.push(name);
        }
        let fields = self.resolve_fields(st, &env);
        if name.is_some() {
            self.resolving.pop();
        }
        fields
    }

    fn resolve_fields(&mut self, st: &'a StructType, env: &Env<'a>) -> ResolveResult<Vec<Field>> {
        let mut fields = Vec::new();
        for decl in &st.fields {
            let ty = self.resolve_type(&decl.ty, env)?;
            for name in decl.field_names() {
                fields.push(Field::new(name, ty.clone()));
            }
        }
        if checked_actual_size(&fields, &self.model).is_none() {
            return Err(LintError::type_error("struct type larger than address space", st.keyword).into());
        }
        Ok(fields)
    }

    fn resolve_type(&mut self, ty: &'a GoType, env: &Env<'a>) -> ResolveResult<TypeKind> {
        match &ty.kind {
            GoTypeKind::Named {
                package: None,
                name,
                args,
            } => self.resolve_name(name, args, env, ty.span),
            GoTypeKind::Named {
                package: Some(package),
                name,
                args,
            } => {
                let Some(path) = self.scope.import_path(env.file, package) else {
                    return self.undefined(package, env, ty.span);
                };
                if !args.is_empty() {
                    return Err(ResolveError::Unknown {
                        name: format!("{}.{}", package, name),
                        span: ty.span,
                    });
                }
                stdlib::package_type(path, name, &self.model).ok_or_else(|| ResolveError::Unknown {
                    name: format!("{}.{}", package, name),
                    span: ty.span,
                })
            }
            GoTypeKind::Pointer(_) => Ok(TypeKind::Pointer),
            GoTypeKind::Slice(_) => Ok(TypeKind::Slice),
            GoTypeKind::Map { .. } => Ok(TypeKind::Map),
            GoTypeKind::Chan { .. } => Ok(TypeKind::Channel),
            GoTypeKind::Func => Ok(TypeKind::Function),
            GoTypeKind::Interface => Ok(TypeKind::Interface),
            GoTypeKind::Array { len, element } => {
                let len_value = ConstEvaluator::new(self.scope).eval(len, env.file, None)?;
                let len = u64::try_from(len_value).map_err(|_| {
                    LintError::type_error(format!("invalid array length {}", len_value), len.span)
                })?;
                let element = self.resolve_type(element, env)?;
                let array = TypeKind::array(element, len);
                if self.model.checked_size_of(&array).is_none() {
                    return Err(LintError::type_error(format!("type {} larger than address space", array), ty.span).into());
                }
                Ok(array)
            }
            GoTypeKind::Struct(st) => Ok(TypeKind::structure(self.resolve_fields(st, env)?)),
        }
    }

    fn resolve_name(&mut self, name: &'a str, args: &'a [GoType], env: &Env<'a>, span: Span) -> ResolveResult<TypeKind> {
        if let Some(param) = env.params.get(name) {
            return match param {
                Some(binding) => self.resolve_type(binding.ty, &binding.env),
                None => Ok(TypeKind::Interface),
            };
        }

        if let Some(symbol) = self.scope.lookup_type(name) {
            return self.resolve_declared(symbol, args, env, span);
        }

        match stdlib::predeclared(name, &self.model) {
            Some(kind) if args.is_empty() => Ok(kind),
            Some(_) => Err(LintError::type_error(format!("{} is not a generic type", name), span).into()),
            None => self.undefined(name, env, span),
        }
    }

    fn resolve_declared(
        &mut self,
        symbol: TypeSymbol<'a>,
        args: &'a [GoType],
        env: &Env<'a>,
        span: Span,
    ) -> ResolveResult<TypeKind> {
        let spec = symbol.spec;
        let name = spec.name.as_str();

        if spec.params.is_empty() && !args.is_empty() {
            return Err(LintError::type_error(format!("{} is not a generic type", name), span).into());
        }
        if !spec.params.is_empty() && args.is_empty() {
            return Err(LintError::type_error(
                format!("cannot use generic type {} without instantiation", name),
                span,
            )
            .into());
        }
        if args.len() != spec.params.len() {
            return Err(LintError::type_error(
                format!(
                    "wrong number of type arguments for {}: have {}, want {}",
                    name,
                    args.len(),
                    spec.params.len()
                ),
                span,
            )
            .into());
        }

        if let Some(kind) = self.cache.get(name) {
            return Ok(kind.clone());
        }
        if self.resolving.contains(&name) {
            return Err(LintError::type_error(format!("invalid recursive type {}", name), span).into());
        }

        let caller = Rc::new(Env {
            file: env.file,
            params: env.params.clone(),
            local: env.local,
        });
        let inner = Env {
            file: symbol.file,
            params: spec
                .params
                .iter()
                .zip(args)
                .map(|(param, ty)| {
                    let binding = Binding {
                        ty,
                        env: Rc::clone(&caller),
                    };
                    (param.as_str(), Some(binding))
                })
                .collect(),
            local: false,
        };

        self.resolving.push(name);
        let resolved = self.resolve_type(&spec.ty, &inner);
        self.resolving.pop();

        let kind = resolved?;
        if spec.params.is_empty() {
            debug!("resolved {} to {}", name, kind.describe());
            self.cache.insert(name, kind.clone());
        }
        Ok(kind)
    }

    fn undefined(&self, name: &str, env: &Env<'a>, span: Span) -> ResolveResult<TypeKind> {
        if env.local {
            Err(ResolveError::Unknown {
                name: name.to_string(),
                span,
            })
        } else {
            Err(LintError::semantic(format!("undefined: {}", name), span).into())
        }
    }
}
