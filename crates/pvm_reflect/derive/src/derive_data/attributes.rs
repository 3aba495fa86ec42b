//! `#[reflect(...)]` attributes on types and fields.

use proc_macro2::Span;
use syn::{Attribute, LitBool, LitStr, Path, spanned::Spanned};

use crate::REFLECT_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes accepted on the type:
///
/// - `default`: use `Default::default` as the constructor.
/// - `implements(TraitA, path::TraitB)`: declared interfaces.
/// - `type_id = "..."`: a type-id collected at link time.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub default: Option<Span>,
    pub implements: Vec<Path>,
    pub type_id: Option<LitStr>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident(REFLECT_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    result.default = Some(meta.path.span());
                    Ok(())
                } else if meta.path.is_ident("implements") {
                    meta.parse_nested_meta(|inner| {
                        result.implements.push(inner.path);
                        Ok(())
                    })
                } else if meta.path.is_ident("type_id") {
                    if result.type_id.is_some() {
                        return Err(meta.error("duplicate `type_id`"));
                    }
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "`type_id` cannot be empty"));
                    }
                    result.type_id = Some(lit);
                    Ok(())
                } else {
                    Err(meta.error("expected `default`, `implements(...)` or `type_id = \"...\"`"))
                }
            })?;
        }

        Ok(result)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// How an accessor of a field is produced.
#[derive(Default)]
pub(crate) enum AccessorSource {
    /// Reads or writes the field directly.
    #[default]
    Generated,
    /// Goes through a user function.
    Custom(Path),
    /// No accessor.
    Disabled,
}

impl AccessorSource {
    fn parse(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Self> {
        let value = meta.value()?;
        if value.peek(LitBool) {
            let flag: LitBool = value.parse()?;
            if flag.value {
                return Err(syn::Error::new(
                    flag.span(),
                    "expected a function path or `false`",
                ));
            }
            Ok(Self::Disabled)
        } else {
            Ok(Self::Custom(value.parse()?))
        }
    }
}

/// Attributes accepted on a field:
///
/// - `skip`: invisible to reflection.
/// - `transient`: reflected, never marshalled.
/// - `parent`: the field embeds the ancestor type.
/// - `getter = path | false`, `setter = path | false`.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub skip: Option<Span>,
    pub transient: Option<Span>,
    pub parent: Option<Span>,
    pub getter: AccessorSource,
    pub setter: AccessorSource,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident(REFLECT_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    result.skip = Some(meta.path.span());
                } else if meta.path.is_ident("transient") {
                    result.transient = Some(meta.path.span());
                } else if meta.path.is_ident("parent") {
                    result.parent = Some(meta.path.span());
                } else if meta.path.is_ident("getter") {
                    result.getter = AccessorSource::parse(&meta)?;
                } else if meta.path.is_ident("setter") {
                    result.setter = AccessorSource::parse(&meta)?;
                } else {
                    return Err(meta.error(
                        "expected `skip`, `transient`, `parent`, `getter = ...` or `setter = ...`",
                    ));
                }
                Ok(())
            })?;
        }

        if let (Some(span), Some(_)) = (result.parent, result.transient) {
            return Err(syn::Error::new(span, "a `parent` field cannot be `transient`"));
        }
        if let (Some(span), true) = (result.skip, result.parent.is_some() || result.transient.is_some()) {
            return Err(syn::Error::new(span, "a `skip` field takes no other attribute"));
        }

        Ok(result)
    }
}

/// Rejects `#[reflect(...)]` where it has no meaning (enum variants).
pub(crate) fn reject_attrs(attrs: &[Attribute]) -> syn::Result<()> {
    match attrs.iter().find(|a| a.path().is_ident(REFLECT_ATTRIBUTE_NAME)) {
        Some(attr) => Err(syn::Error::new(
            attr.span(),
            "`#[reflect]` is not supported here",
        )),
        None => Ok(()),
    }
}
