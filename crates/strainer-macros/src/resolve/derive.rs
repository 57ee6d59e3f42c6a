//! Implementation of the `#[derive(Resolve)]` macro.
//!
//! Generates the `Resolve` accessor table for a struct plus one constant per
//! exposed field holding its path segment name.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Result,
    Type,
};

use super::attrs::{parse_field_attrs, FieldKind};

/// Main implementation of the Resolve derive macro.
pub fn resolve_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Resolve can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Resolve can only be derived for structs",
            ))
        }
    };

    let mut field_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        // untyped fields are not exposed
        let kind = match attrs.kind {
            Some(kind) => kind,
            None => continue,
        };

        let segment = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if seen.contains(&segment) {
            return Err(Error::new(
                attrs.span,
                format!("duplicate field name '{segment}'"),
            ));
        }
        seen.push(segment.clone());

        let const_name = format_ident!("{}", to_screaming_snake_case(&segment));
        field_constants.push(quote! {
            /// Path segment of this field.
            pub const #const_name: &'static str = #segment;
        });

        let value = value_expr(kind);
        let arm = if is_option(&field.ty) {
            quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(v) => #value,
                    ::core::option::Option::None => ::strainer::Value::Null,
                }
            }
        } else {
            quote! {{
                let v = &self.#field_name;
                #value
            }}
        };

        field_arms.push(quote! {
            #segment => ::core::option::Option::Some(#arm),
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::strainer::Resolve for #struct_name #ty_generics #where_clause {
            fn resolve_field(&self, field: &str) -> ::core::option::Option<::strainer::Value<'_>> {
                match field {
                    #(#field_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Builds the `Value` for a field, given `v: &FieldType`.
fn value_expr(kind: FieldKind) -> TokenStream {
    match kind {
        FieldKind::String => quote! {
            ::strainer::Value::String(::core::convert::AsRef::<str>::as_ref(v))
        },
        FieldKind::Integer => quote! {
            ::strainer::Value::Number(::strainer::Number::from(*v))
        },
        FieldKind::Float => quote! {
            ::strainer::Value::Number(::strainer::Number::F32(*v))
        },
        FieldKind::Double => quote! {
            ::strainer::Value::Number(::strainer::Number::from(*v))
        },
        FieldKind::Date => quote! {
            ::strainer::Value::Date(::strainer::ToDate::to_date(v))
        },
        FieldKind::Bool => quote! {
            ::strainer::Value::Bool(*v)
        },
        FieldKind::Text => quote! {
            ::strainer::Value::Text(::std::string::ToString::to_string(v))
        },
        FieldKind::Nested => quote! {
            ::strainer::Value::Object(v as &dyn ::strainer::Resolve)
        },
        FieldKind::List => quote! {
            ::strainer::Value::List(v.len())
        },
    }
}

/// Returns `true` for `Option<T>` (by last path segment).
fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|segment| {
        segment.ident == "Option"
            && matches!(
                &segment.arguments,
                PathArguments::AngleBracketed(args)
                    if args.args.len() == 1
                        && matches!(args.args.first(), Some(GenericArgument::Type(_)))
            )
    })
}

/// Convert a field name to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("created_at"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("createdAt"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("birth-date"), "BIRTH_DATE");
    }

    #[test]
    fn test_option_detection() {
        let ty: Type = syn::parse_str("Option<String>").unwrap();
        assert!(is_option(&ty));
        let ty: Type = syn::parse_str("std::option::Option<Address>").unwrap();
        assert!(is_option(&ty));
        let ty: Type = syn::parse_str("Vec<String>").unwrap();
        assert!(!is_option(&ty));
        let ty: Type = syn::parse_str("String").unwrap();
        assert!(!is_option(&ty));
    }

    #[test]
    fn test_generates_accessor_arms() {
        let input: DeriveInput = syn::parse_str(
            r#"
            struct Person {
                #[field(String)]
                name: String,
                #[field(Integer, rename = "years")]
                age: u32,
                #[field(Nested)]
                address: Option<Address>,
                #[field(skip)]
                secret: String,
                untyped: u8,
            }
            "#,
        )
        .unwrap();
        let output = resolve_derive_impl(input).unwrap().to_string();
        assert!(output.contains("\"name\""));
        assert!(output.contains("\"years\""));
        assert!(output.contains("YEARS"));
        assert!(output.contains("\"address\""));
        assert!(!output.contains("\"secret\""));
        assert!(!output.contains("\"untyped\""));
    }

    #[test]
    fn test_rejects_tuple_structs_and_duplicates() {
        let input: DeriveInput = syn::parse_str("struct Pair(u8, u8);").unwrap();
        assert!(resolve_derive_impl(input).is_err());

        let input: DeriveInput = syn::parse_str(
            r#"
            struct Dup {
                #[field(String)]
                a: String,
                #[field(String, rename = "a")]
                b: String,
            }
            "#,
        )
        .unwrap();
        assert!(resolve_derive_impl(input).is_err());
    }
}
