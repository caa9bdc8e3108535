//! Config command

use anyhow::{anyhow, Context, Result};
use projwiz_core::config::{ConfigStore, WizardConfig};

use crate::cli::{AddTemplateArgs, ConfigCommands, ConfigSetArgs, ConfigShowArgs, RemoveTemplateArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, store: &ConfigStore, config: WizardConfig) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, store, &config),
        ConfigCommands::Set(args) => set(args, store, config),
        ConfigCommands::AddTemplate(args) => add_template(args, store, config),
        ConfigCommands::RemoveTemplate(args) => remove_template(args, store, config),
    }
}

fn show(args: ConfigShowArgs, store: &ConfigStore, config: &WizardConfig) -> Result<()> {
    let redacted = config.redacted();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&redacted)?);
        return Ok(());
    }

    output::header(&format!("Configuration ({})", store.path()));
    let credential = if redacted.repo_credential.is_empty() {
        "(not set)"
    } else {
        redacted.repo_credential.as_str()
    };
    output::kv("repoCredential", credential);
    output::kv("backendAccount", &redacted.backend_account);
    output::kv("defaultOrg", &redacted.default_org);
    output::kv("projectsDir", &redacted.projects_dir);
    output::kv("hostedApiUrl", &redacted.hosted_api_url);
    output::kv("templates", &redacted.templates.len().to_string());
    Ok(())
}

fn save(store: &ConfigStore, config: &WizardConfig) -> Result<()> {
    store
        .try_save(config)
        .with_context(|| format!("Failed to save {}", store.path()))
}

fn set(args: ConfigSetArgs, store: &ConfigStore, mut config: WizardConfig) -> Result<()> {
    config.set_value(&args.key, &args.value)?;
    save(store, &config)?;
    output::success(&format!("Set {}", args.key));
    Ok(())
}

fn add_template(args: AddTemplateArgs, store: &ConfigStore, mut config: WizardConfig) -> Result<()> {
    let replaced = config.templates.contains_key(&args.name);
    config.add_template(&args.name, &args.url);
    save(store, &config)?;

    if replaced {
        output::success(&format!("Updated template {}", args.name));
    } else {
        output::success(&format!("Added template {}", args.name));
    }
    Ok(())
}

fn remove_template(args: RemoveTemplateArgs, store: &ConfigStore, mut config: WizardConfig) -> Result<()> {
    if config.remove_template(&args.name).is_none() {
        return Err(anyhow!("Template '{}' is not registered", args.name));
    }
    save(store, &config)?;
    output::success(&format!("Removed template {}", args.name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        ConfigStore::new(root.join("config.json"))
    }

    #[test]
    fn test_set_persists_value() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let args = ConfigSetArgs {
            key: "default_org".to_string(),
            value: "acme.io".to_string(),
        };
        set(args, &store, WizardConfig::default()).unwrap();

        assert_eq!(store.load().default_org, "acme.io");
    }

    #[test]
    fn test_set_unknown_key_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let args = ConfigSetArgs {
            key: "colour".to_string(),
            value: "blue".to_string(),
        };
        assert!(set(args, &store, WizardConfig::default()).is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_template_add_and_remove() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let add = AddTemplateArgs {
            name: "expo".to_string(),
            url: "acme/expo-template".to_string(),
        };
        add_template(add, &store, WizardConfig::default()).unwrap();
        assert_eq!(store.load().templates["expo"], "acme/expo-template");

        let remove = RemoveTemplateArgs {
            name: "expo".to_string(),
        };
        remove_template(remove, &store, store.load()).unwrap();
        assert!(!store.load().templates.contains_key("expo"));

        let missing = RemoveTemplateArgs {
            name: "expo".to_string(),
        };
        assert!(remove_template(missing, &store, store.load()).is_err());
    }
}
