use syn::{Data, DeriveInput, Ident, spanned::Spanned};

use super::{ReflectMeta, reject_attrs};

/// An enum: a fixed-member union, reflected by variant name only.
pub(crate) struct ReflectEnum<'a> {
    pub meta: ReflectMeta<'a>,
    pub variants: Vec<&'a Ident>,
}

impl<'a> ReflectEnum<'a> {
    pub fn new(meta: ReflectMeta<'a>, input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(syn::Error::new(input.span(), "expected an enum"));
        };

        let mut variants = Vec::with_capacity(data.variants.len());
        for variant in &data.variants {
            reject_attrs(&variant.attrs)?;
            for field in &variant.fields {
                reject_attrs(&field.attrs)?;
            }
            variants.push(&variant.ident);
        }

        Ok(Self { meta, variants })
    }
}
