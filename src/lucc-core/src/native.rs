//! Missing native field reports
//!
//! Script classes declare properties that the engine mirrors in C++ structs.
//! A property with no native offset has no C++ counterpart yet; the report
//! prints ready-to-paste field declarations plus the property link block.

use std::fmt::Write as _;

use crate::object::{ClassData, PropertyDef, PropertyType};

/// C++ class name: `A` prefix for actors, `U` for everything else
pub fn cpp_class_name(name: &str, is_actor: bool) -> String {
    format!("{}{}", if is_actor { 'A' } else { 'U' }, name)
}

/// C++ type of a property
pub fn cpp_type(ty: &PropertyType) -> String {
    match ty {
        PropertyType::Byte => "u8".to_string(),
        PropertyType::Int => "int".to_string(),
        PropertyType::Bool => "bool".to_string(),
        PropertyType::Float => "float".to_string(),
        PropertyType::Object { class, is_actor } => format!("{}*", cpp_class_name(class, *is_actor)),
        PropertyType::Name => "FName".to_string(),
        PropertyType::String | PropertyType::Str => "FString*".to_string(),
        PropertyType::Class => "UClass*".to_string(),
        PropertyType::Array { inner } => format!("TArray<{}>*", cpp_type(inner)),
        PropertyType::Struct { name } => format!("F{}", name),
        PropertyType::Vector => "FVector".to_string(),
        PropertyType::Rotator => "FRotator".to_string(),
        PropertyType::Map => "Map".to_string(),
        PropertyType::FixedArray => "???".to_string(),
        PropertyType::Pointer => "u64".to_string(),
    }
}

fn field_declaration(prop: &PropertyDef) -> String {
    let mut line = format!("  {} {}", cpp_type(&prop.ty), prop.name);
    if prop.array_dim > 1 {
        let _ = write!(line, "[{}]", prop.array_dim);
    }
    line.push(';');
    line
}

/// Build the report for one class, or `None` when nothing is missing
pub fn missing_native_fields(class_name: &str, class: &ClassData) -> Option<String> {
    let missing: Vec<&PropertyDef> = class
        .properties
        .iter()
        .filter(|prop| prop.native_offset.is_none())
        .collect();

    if missing.is_empty() {
        return None;
    }

    let rule = "//====================================================================";
    let cpp_name = cpp_class_name(class_name, class.is_actor);
    let mut report = String::new();

    let _ = writeln!(report, "{}", rule);
    let _ = writeln!(report, "// Missing native fields for class '{}'", class_name);
    let _ = writeln!(report, "{}", rule);
    for prop in &missing {
        let _ = writeln!(report, "{}", field_declaration(prop));
    }

    let _ = writeln!(report, "BEGIN_PROPERTY_LINK( {}, {} )", cpp_name, missing.len());
    for prop in &missing {
        let _ = writeln!(report, "  LINK_NATIVE_PROPERTY( {} );", prop.name);
    }
    let _ = writeln!(report, "END_PROPERTY_LINK()");

    Some(report)
}
