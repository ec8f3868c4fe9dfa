//! Template generation code for Config derive macro.

use proc_macro2::TokenStream;
use quote::quote;

use crate::config::field::FieldInfo;
use crate::config::types::{format_default_for_type, type_to_string};

/// Generate template code (TokenStream) for fields
pub fn generate_template_code(fields: &[&FieldInfo]) -> TokenStream {
    let field_codes: Vec<TokenStream> = fields
        .iter()
        .map(|f| generate_field_template_code(f))
        .collect();

    quote! {
        #(#field_codes)*
    }
}

/// Generate TOML template code for a single field
fn generate_field_template_code(info: &FieldInfo) -> TokenStream {
    let field_name = &info.name;
    let toml_name = &info.toml_name;

    // With inline_doc the doc comment moves after the value; otherwise it is
    // emitted as comment lines above the field.
    let inline_comment = if info.inline_doc {
        info.doc.as_deref().map(first_line)
    } else {
        None
    };

    let doc_code = if let Some(ref doc) = info.doc
        && !info.inline_doc
    {
        let doc_lines: Vec<_> = doc.lines().map(|l| format!("# {}\n", l.trim())).collect();
        let doc_str = doc_lines.join("");
        quote! { out.push_str(#doc_str); }
    } else {
        quote! {}
    };

    // For sub fields - output the sub config's template_with_header
    if info.sub {
        let field_ty = &info.ty;
        return quote! {
            out.push('\n');
            #doc_code
            out.push_str(&<#field_ty>::template_with_header());
        };
    }

    let ty_str = type_to_string(&info.ty);
    let is_optional = ty_str.starts_with("Option<");

    // Optional fields without explicit default - commented out
    if is_optional && info.default.is_none() {
        let line = match inline_comment {
            Some(comment) => format!("# {} = \"\"  # {}\n", toml_name, comment),
            None => format!("# {} = \"\"\n", toml_name),
        };
        return quote! {
            #doc_code
            out.push_str(#line);
        };
    }

    // Fields with explicit default value (compile-time known)
    if let Some(ref default_val) = info.default {
        let formatted = format_default_for_type(default_val, &ty_str);
        let line = match inline_comment {
            Some(comment) => format!("{} = {}  # {}\n", toml_name, formatted, comment),
            None => format!("{} = {}\n", toml_name, formatted),
        };
        return quote! {
            #doc_code
            out.push_str(#line);
        };
    }

    // Fields using Default::default() - runtime value
    let inline_code = match inline_comment {
        Some(comment) => quote! {
            out.push_str("  # ");
            out.push_str(#comment);
        },
        None => quote! {},
    };

    quote! {
        #doc_code
        out.push_str(#toml_name);
        out.push_str(" = ");
        out.push_str(&toml::Value::try_from(default.#field_name.clone())
            .map(|v| v.to_string())
            .unwrap_or_default());
        #inline_code
        out.push('\n');
    }
}

/// First line of a doc comment, trimmed.
fn first_line(doc: &str) -> String {
    doc.lines().next().unwrap_or_default().trim().to_string()
}
