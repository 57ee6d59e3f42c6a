//! Attribute parsing for the Resolve derive macro.
//!
//! Parses the `#[field(...)]` attributes that declare how a struct field is
//! exposed to filters and sorts.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

const EXPECTED_KINDS: &str = "String, Integer, Float, Double, Date, Bool, Text, Nested, List";

/// How a field's value is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Borrowed string: `#[field(String)]`
    String,
    /// Any integer primitive: `#[field(Integer)]`
    Integer,
    /// `f32`: `#[field(Float)]`
    Float,
    /// `f64` or `f32`: `#[field(Double)]`
    Double,
    /// Any `ToDate` type: `#[field(Date)]`
    Date,
    /// `bool`: `#[field(Bool)]`
    Bool,
    /// Any `Display` type, rendered as text: `#[field(Text)]`
    Text,
    /// Nested `Resolve` type the path can descend into: `#[field(Nested)]`
    Nested,
    /// Collection with a `len()`; paths may not traverse it: `#[field(List)]`
    List,
}

impl FieldKind {
    /// Parse a field kind from an identifier.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        match ident.to_string().as_str() {
            "String" | "string" => Ok(FieldKind::String),
            "Integer" | "integer" | "Int" => Ok(FieldKind::Integer),
            "Float" | "float" => Ok(FieldKind::Float),
            "Double" | "double" => Ok(FieldKind::Double),
            "Date" | "date" => Ok(FieldKind::Date),
            "Bool" | "boolean" => Ok(FieldKind::Bool),
            "Text" | "text" => Ok(FieldKind::Text),
            "Nested" | "nested" => Ok(FieldKind::Nested),
            "List" | "list" => Ok(FieldKind::List),
            other => Err(Error::new(
                ident.span(),
                format!("unknown field kind: '{other}'. Expected one of: {EXPECTED_KINDS}"),
            )),
        }
    }
}

/// Field-level attributes from `#[field(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    pub kind: Option<FieldKind>,
    /// Exclude this field from resolution.
    pub skip: bool,
    /// Path segment name (default: the Rust field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            kind: None,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        if attr.kind.is_some() {
                            return Err(Error::new(ident.span(), "field kind given twice"));
                        }
                        attr.kind = Some(FieldKind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected field kind ({EXPECTED_KINDS}) or skip"),
                        ));
                    }
                }

                Meta::NameValue(nv) if nv.path.is_ident("rename") => match &nv.value {
                    syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) => {
                        if s.value().is_empty() || s.value().contains('.') {
                            return Err(Error::new(
                                s.span(),
                                "rename must be a non-empty name without '.'",
                            ));
                        }
                        attr.rename = Some(s.value());
                    }
                    other => {
                        return Err(Error::new(other.span(), "rename must be a string literal"));
                    }
                },

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        format!(
                            "unknown field attribute. Expected: {EXPECTED_KINDS}, skip, or rename = \"...\""
                        ),
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[field(...)]` attributes from a struct field.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("field") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_field(tokens: &str) -> Result<FieldAttr> {
        syn::parse_str::<FieldAttr>(tokens)
    }

    #[test]
    fn test_field_kinds() {
        for (tokens, kind) in [
            ("String", FieldKind::String),
            ("Integer", FieldKind::Integer),
            ("Float", FieldKind::Float),
            ("Double", FieldKind::Double),
            ("Date", FieldKind::Date),
            ("Bool", FieldKind::Bool),
            ("Text", FieldKind::Text),
            ("Nested", FieldKind::Nested),
            ("List", FieldKind::List),
        ] {
            let attr = parse_field(tokens).unwrap();
            assert_eq!(attr.kind, Some(kind), "{tokens}");
            assert!(!attr.skip);
        }
    }

    #[test]
    fn test_field_lowercase_aliases() {
        assert_eq!(parse_field("integer").unwrap().kind, Some(FieldKind::Integer));
        assert_eq!(parse_field("boolean").unwrap().kind, Some(FieldKind::Bool));
        assert_eq!(parse_field("nested").unwrap().kind, Some(FieldKind::Nested));
    }

    #[test]
    fn test_field_skip() {
        let attr = parse_field("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn test_field_rename() {
        let attr = parse_field(r#"Date, rename = "createdAt""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Date));
        assert_eq!(attr.rename, Some("createdAt".to_string()));
    }

    #[test]
    fn test_field_rename_rejects_dotted_names() {
        let result = parse_field(r#"String, rename = "a.b""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_field_invalid_kind() {
        let result = parse_field("Timestamp");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown field kind"));
    }

    #[test]
    fn test_field_kind_twice() {
        assert!(parse_field("String, Integer").is_err());
    }
}
