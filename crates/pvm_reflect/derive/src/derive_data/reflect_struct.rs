use syn::{Data, DeriveInput, Fields, Ident, Type, spanned::Spanned};

use super::{FieldAttributes, ReflectMeta};

/// A struct with named fields.
pub(crate) struct ReflectStruct<'a> {
    pub meta: ReflectMeta<'a>,
    /// Reflected fields in declaration order; `skip` fields are dropped.
    pub fields: Vec<StructField<'a>>,
}

pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl StructField<'_> {
    /// `bool` fields get an `is_` getter.
    pub fn is_bool(&self) -> bool {
        matches!(self.ty, Type::Path(path) if path.qself.is_none() && path.path.is_ident("bool"))
    }

    /// The field name without a raw-identifier prefix.
    pub fn name(&self) -> String {
        let name = self.ident.to_string();
        match name.strip_prefix("r#") {
            Some(stripped) => stripped.to_owned(),
            None => name,
        }
    }
}

impl<'a> ReflectStruct<'a> {
    pub fn new(meta: ReflectMeta<'a>, input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new(input.span(), "expected a struct"));
        };

        let mut fields = Vec::new();
        match &data.fields {
            Fields::Named(named) => {
                for field in &named.named {
                    let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
                    if attrs.skip.is_some() {
                        continue;
                    }
                    let Some(ident) = field.ident.as_ref() else {
                        return Err(syn::Error::new(field.span(), "expected a named field"));
                    };
                    fields.push(StructField {
                        ident,
                        ty: &field.ty,
                        attrs,
                    });
                }
            }
            Fields::Unit => {}
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new(
                    unnamed.span(),
                    "tuple structs cannot be reflected, use named fields",
                ));
            }
        }

        let mut parents = fields.iter().filter_map(|f| f.attrs.parent);
        if let (Some(_), Some(second)) = (parents.next(), parents.next()) {
            return Err(syn::Error::new(second, "only one field can be the `parent`"));
        }

        Ok(Self { meta, fields })
    }
}
