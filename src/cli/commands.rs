//! Command dispatch
//!
//! Every tree command runs one cycle: load settings, open the stored tree,
//! apply the request, save, print.

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::export::write_document;
use crate::application::i18n::{family_tree_title, text};
use crate::application::{
    EventOutcome, ExportAdapter, ExportRequest, FamilySession, LoadSource, RenderAdapter,
    RenderStyle, TextKey,
};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, write_template, Settings};
use crate::domain::{generation_label, search, MemberDraft, MemberRef, TreeEvent, Wealth};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::RealFileSystem;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        Some(command) => {
            let container = ServiceContainer::new(load_settings(cli)?);
            dispatch(&container, cli, command)
        }
        None => {
            let container = ServiceContainer::new(load_settings(cli)?);
            cmd_show(&container, false, false)
        }
    }
}

fn dispatch(container: &ServiceContainer, cli: &Cli, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Show { compact, ids } => cmd_show(container, *compact, *ids),
        Commands::Stats => cmd_stats(container),
        Commands::Search { query } => cmd_search(container, query),
        Commands::Add {
            parent,
            name,
            birth,
            married,
            has_children,
            spouse,
            wealth,
            by_id,
        } => {
            let draft = MemberDraft::new(name.as_str())?
                .birth(birth.as_str())?
                .married(*married)
                .has_children(*has_children)
                .spouse(spouse.as_str())
                .wealth(Wealth::new(*wealth)?);
            let event = TreeEvent::NodeAddRequested {
                parent: member_ref(parent, *by_id),
                draft,
            };
            cmd_edit(container, cli, event)
        }
        Commands::Delete { member, by_id } => {
            let event = TreeEvent::NodeDeleteRequested {
                member: member_ref(member, *by_id),
            };
            cmd_edit(container, cli, event)
        }
        Commands::Export { output } => cmd_export(container, output.as_ref()),
        Commands::Login => cmd_login(container, cli),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

/// Layered settings plus command-line overrides.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let cwd = std::env::current_dir().map_err(|e| InfraError::io("resolve working directory", e))?;
    let mut settings = Settings::load(Some(&cwd))?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(lang) = cli.lang {
        settings.language = lang.code().to_string();
    }
    if let Some(name) = &cli.family_name {
        settings.family_name = name.clone();
    }
    if let Some(origin) = &cli.family_origin {
        settings.family_origin = origin.clone();
    }
    debug!("data_dir={:?} language={}", settings.data_dir, settings.language);
    Ok(settings)
}

fn member_ref(value: &str, by_id: bool) -> MemberRef {
    if by_id {
        MemberRef::by_id(value)
    } else {
        MemberRef::by_name(value)
    }
}

/// Open the stored tree, telling the user when it had to be reset.
fn open_session(container: &ServiceContainer) -> CliResult<FamilySession> {
    let session = container.session()?;
    if let LoadSource::Recovered { reason } = session.source() {
        output::warning(&format!(
            "stored tree unusable, starting from the default tree: {reason}"
        ));
    }
    Ok(session)
}

#[instrument(level = "debug", skip(container))]
fn cmd_show(container: &ServiceContainer, compact: bool, ids: bool) -> CliResult<()> {
    let session = open_session(container)?;
    let style = if compact {
        RenderStyle::Compact
    } else {
        RenderStyle::Detailed
    };
    output::header(&family_tree_title(
        container.language(),
        &container.settings.family_name,
    ));
    let view = container.renderer(style, ids).render(session.tree());
    output::info(view.trim_end());
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_stats(container: &ServiceContainer) -> CliResult<()> {
    let session = open_session(container)?;
    let lang = container.language();
    let stats = session.stats();
    output::header(text(lang, TextKey::FamilyStats));
    output::stat(text(lang, TextKey::TotalMembers), &stats.members);
    output::stat(text(lang, TextKey::Generations), &stats.generations);
    output::stat(
        text(lang, TextKey::AverageWealth),
        &format!("{:.2}", stats.average_wealth),
    );
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_search(container: &ServiceContainer, query: &str) -> CliResult<()> {
    let session = open_session(container)?;
    let hits = search(session.tree(), query);
    debug!("search {:?}: {} hits", query, hits.len());
    if hits.is_empty() {
        output::info(text(container.language(), TextKey::NoResults));
        return Ok(());
    }
    for member in hits {
        output::info(&format!(
            "{} ({}) [{}]",
            member.name,
            generation_label(member.attributes.rank),
            member.id
        ));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container, cli))]
fn cmd_edit(container: &ServiceContainer, cli: &Cli, event: TreeEvent) -> CliResult<()> {
    let mut session = open_session(container)?;
    if let Some(code) = &cli.admin_code {
        session.login(&container.admin_gate(), code)?;
    }
    match session.handle(event)? {
        EventOutcome::Added { member } => {
            output::success(&format!("Added member {member}"));
        }
        EventOutcome::Deleted { removed } => {
            let count = removed.iter().count();
            output::success(&format!(
                "Deleted {} ({} member{})",
                removed.name,
                count,
                if count == 1 { "" } else { "s" }
            ));
        }
    }
    let stats = session.stats();
    output::detail(&format!(
        "{} members, {} generations",
        stats.members, stats.generations
    ));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_export(container: &ServiceContainer, destination: Option<&PathBuf>) -> CliResult<()> {
    let session = open_session(container)?;
    let settings = &container.settings;
    let view = container
        .renderer(RenderStyle::Detailed, false)
        .render(session.tree());
    let request = ExportRequest {
        view: &view,
        family_name: &settings.family_name,
        family_origin: &settings.family_origin,
        generations: session.stats().generations,
    };
    let doc = container.exporter().export(&request);
    let target = destination
        .cloned()
        .unwrap_or_else(|| settings.export.dir.clone());
    let path = write_document(container.fs.as_ref(), &doc, &target)?;
    output::action(
        "Exported",
        &format!("{} ({} pages)", path.display(), doc.pages.len()),
    );
    Ok(())
}

#[instrument(level = "debug", skip(container, cli))]
fn cmd_login(container: &ServiceContainer, cli: &Cli) -> CliResult<()> {
    let code = cli.admin_code.as_deref().ok_or_else(|| {
        CliError::InvalidArgs("pass --admin-code or set FAMTREE_LOGIN_CODE".to_string())
    })?;
    container.admin_gate().verify(code)?;
    output::success("Admin code accepted");
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::InvalidArgs("cannot determine global config directory".to_string())
                })?
            } else {
                let cwd = std::env::current_dir()
                    .map_err(|e| InfraError::io("resolve working directory", e))?;
                local_config_path(&cwd)
            };
            write_template(&RealFileSystem, &path)?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            let settings = load_settings(cli)?;
            match global_config_path() {
                Some(path) => output::info(&format!("global:  {}", path.display())),
                None => output::info("global:  (unavailable)"),
            }
            let cwd = std::env::current_dir()
                .map_err(|e| InfraError::io("resolve working directory", e))?;
            output::info(&format!("local:   {}", local_config_path(&cwd).display()));
            output::info(&format!("storage: {}", settings.storage_path().display()));
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
