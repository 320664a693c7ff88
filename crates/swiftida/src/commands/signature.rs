//! Commands operating on type strings passed on the command line.

use anyhow::{Context, Result};
use swiftida_core::ArchProfile;
use swiftida_types::command::MENU_PATH;
use swiftida_types::{CommandRegistry, ParsedSignature, SignatureEditor};

/// Print the components of a parsed type string.
pub fn handle_parse(profile: &ArchProfile, ty: &str, json: bool) -> Result<()> {
    let sig = ParsedSignature::parse(ty, profile)
        .with_context(|| format!("Failed to parse type: {}", ty))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sig)?);
        return Ok(());
    }

    println!("Signature ({})", profile.architecture());
    println!("{}", "=".repeat(40));
    println!("Base:      {}", sig.base_tokens.join(" "));
    if sig.return_bindings.is_empty() {
        println!("Returns:   (none)");
    } else {
        let rets: Vec<String> = sig.return_bindings.iter().map(|b| b.to_string()).collect();
        println!("Returns:   {}", rets.join(", "));
    }
    println!("Arguments: {}", sig.arguments.len());
    for (i, arg) in sig.arguments.iter().enumerate() {
        println!("  [{}] {}", i, arg);
    }
    println!("\nSerialized: {}", sig);

    Ok(())
}

/// Print the result of applying one command to a type string.
pub fn handle_rewrite(profile: &ArchProfile, ty: &str, command: &str) -> Result<()> {
    let registry = CommandRegistry::for_profile(profile);
    let cmd = registry.get(command).with_context(|| {
        format!(
            "Unknown command '{}' for {}. Run `swiftida commands` to list them",
            command,
            profile.architecture()
        )
    })?;

    let new_type = SignatureEditor::new(profile)
        .rewrite(ty, cmd.request)
        .with_context(|| format!("Failed to {} on: {}", cmd.request, ty))?;
    println!("{}", new_type);
    Ok(())
}

/// List the registered commands.
pub fn handle_list_commands(profile: &ArchProfile) {
    let registry = CommandRegistry::for_profile(profile);

    println!("Commands for {}:", profile.architecture());
    println!("{}", "=".repeat(60));
    for cmd in registry.iter() {
        println!("  {:<34} {}{}", cmd.id, MENU_PATH, cmd.label);
    }
}
