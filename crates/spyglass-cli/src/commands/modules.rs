//! `spyglass modules` - list registered lookup modules.

use anyhow::{bail, Result};
use spyglass_core::TargetType;
use spyglass_plugin::ModuleDescriptor;

pub fn run(target_type: Option<&str>, json: bool) -> Result<()> {
    let registry = super::registry();

    let modules = match target_type {
        Some(raw) => {
            let Some(ty) = TargetType::parse(raw) else {
                let valid: Vec<&str> = TargetType::ALL.iter().map(TargetType::as_str).collect();
                bail!("unknown target type '{raw}'; valid types: {}", valid.join(", "));
            };
            registry.get_by_type(ty)
        }
        None => registry.get_all(),
    };

    let mut descriptors: Vec<ModuleDescriptor> =
        modules.iter().map(|m| m.descriptor().clone()).collect();
    descriptors.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    let mut last_category = "";
    for descriptor in &descriptors {
        if descriptor.category != last_category {
            println!("{}", descriptor.category.to_uppercase());
            last_category = &descriptor.category;
        }

        let mut types: Vec<&str> = descriptor
            .free_types
            .iter()
            .map(TargetType::as_str)
            .collect();
        types.extend(descriptor.key_gated_types.iter().map(TargetType::as_str));

        let gate = if descriptor.required_keys().is_empty() {
            String::new()
        } else {
            format!(" (requires {} key)", descriptor.required_keys().join(", "))
        };

        println!(
            "  {} [{}]{} - {}",
            descriptor.name,
            types.join(", "),
            gate,
            descriptor.description
        );
    }

    if descriptors.is_empty() {
        println!("No modules registered for that type.");
    }

    Ok(())
}
