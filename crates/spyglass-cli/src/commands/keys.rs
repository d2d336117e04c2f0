//! `spyglass keys` - show credential requirements and their status.

use anyhow::Result;
use serde_json::json;
use spyglass_core::{CredentialStore, EnvCredentialStore};

pub fn run(json: bool) -> Result<()> {
    let registry = super::registry();
    let store = EnvCredentialStore;

    let grouped = registry.credential_requirements();
    let mut categories: Vec<&String> = grouped.keys().collect();
    categories.sort();

    if json {
        let mut out = Vec::new();
        for category in &categories {
            for req in &grouped[*category] {
                out.push(json!({
                    "category": category,
                    "key_name": req.key_name,
                    "display_name": req.display_name,
                    "signup_url": req.signup_url,
                    "is_required": req.is_required,
                    "env_var": EnvCredentialStore::var_name(&req.key_name),
                    "is_set": store.has(&req.key_name),
                }));
            }
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!("No modules declare credentials.");
        return Ok(());
    }

    for category in categories {
        println!("{}", category.to_uppercase());
        let mut reqs = grouped[category].clone();
        reqs.sort_by(|a, b| a.key_name.cmp(&b.key_name));

        for req in reqs {
            let status = if store.has(&req.key_name) {
                "set"
            } else {
                "missing"
            };
            let need = if req.is_required { "required" } else { "optional" };
            println!(
                "  {} ({need}, {status}) - export {}",
                req.display_name,
                EnvCredentialStore::var_name(&req.key_name)
            );
            println!("      sign up: {}", req.signup_url);
        }
    }

    Ok(())
}
