/**
 * TEKPARC - Point d'entrée de l'application de suivi de maintenance
 *
 * RÔLE : Orchestration des modules : config, magasin, dépôts, rendu, export.
 * Bootstrap du système puis dispatch des commandes CLI.
 *
 * ARCHITECTURE : Dépôts construits explicitement au démarrage et injectés là
 * où ils servent, pas de singleton global. L'enregistrement d'un rapport et
 * son export PDF restent deux étapes indépendantes : un export raté
 * n'annule jamais un enregistrement réussi.
 */

mod prompt;
mod seed;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tekparc_core::assets::AssetLocator;
use tekparc_core::config::load_config;
use tekparc_core::export::{suggested_filename, ChromiumEngine};
use tekparc_core::models::{
    AntivirusStatus, CheckState, HddHealth, MaintenanceReport, WorkstationReport,
};
use tekparc_core::{
    ClientRepository, ExportOutcome, PdfExporter, RecordStore, ReportRepository, TemplateRenderer,
};

use crate::prompt::CliPrompt;

#[derive(Parser)]
#[command(name = "tekparc", about = "Suivi de maintenance du parc informatique clients")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Liste les clients et leurs postes
    Clients,
    /// Liste les rapports, du plus récent au plus ancien
    Reports {
        /// Restreint aux rapports d'un client
        #[arg(long)]
        client: Option<String>,
    },
    /// Enregistre un rapport pré-rempli pour le parc actuel d'un client
    DemoReport {
        client_id: String,
        /// Responsable de la maintenance
        #[arg(long)]
        technician: String,
    },
    /// Supprime un rapport
    DeleteReport { report_id: String },
    /// Exporte un rapport en PDF
    Export {
        report_id: String,
        /// Destination directe, sans invite interactive
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let cfg = load_config().await;

    let store = Arc::new(
        RecordStore::open(cfg.store_path())
            .with_context(|| format!("ouverture du magasin {}", cfg.store_path().display()))?,
    );
    let clients = ClientRepository::new(store.clone());
    let reports = ReportRepository::new(store.clone());
    seed::seed_if_first_run(&store, &clients)?;

    match cli.command {
        Command::Clients => {
            for client in clients.list()? {
                println!("{} - {} ({} postes)", client.id, client.name, client.workstations.len());
                for ws in &client.workstations {
                    println!("    {} [{:?}]", ws.name, ws.kind);
                }
            }
        }

        Command::Reports { client } => {
            let mut listed = reports.list(client.as_deref())?;
            // L'ordre de stockage est chronologique ; l'affichage inverse
            // (plus récent en premier) est une affaire de présentation.
            listed.reverse();
            for report in listed {
                println!(
                    "{} - {} - client {} - {} ({} postes)",
                    report.id.as_deref().unwrap_or("?"),
                    report.date,
                    report.client_id,
                    report.technician,
                    report.workstations.len()
                );
            }
        }

        Command::DemoReport { client_id, technician } => {
            let client = clients
                .find(&client_id)?
                .with_context(|| format!("client inconnu : {client_id}"))?;
            let report = prefilled_report(&client_id, &technician, &client.workstations);
            let id = reports.save(&report)?;
            println!("Rapport enregistré : {id}");
        }

        Command::DeleteReport { report_id } => {
            reports.delete(&report_id)?;
            println!("Rapport supprimé (si présent) : {report_id}");
        }

        Command::Export { report_id, out } => {
            let report = reports
                .find(&report_id)?
                .with_context(|| format!("rapport inconnu : {report_id}"))?;
            let client = clients.find(&report.client_id)?;

            let renderer = TemplateRenderer::new(AssetLocator::new(cfg.assets_dir.clone()));
            let html = renderer.render(&report, client.as_ref())?;

            let mut engine = ChromiumEngine::new();
            if let Some(bin) = &cfg.chromium_bin {
                engine = engine.with_binary(bin);
            }
            let prompt = match out {
                Some(path) => CliPrompt::Preset(path),
                None => CliPrompt::Interactive,
            };
            let exporter = PdfExporter::new(engine, prompt);

            let suggested = suggested_filename(&report.client_id, &report.date);
            match exporter.export(&html, &suggested).await {
                ExportOutcome::Saved { file_path } => {
                    println!("PDF enregistré : {}", file_path.display());
                }
                ExportOutcome::Cancelled => println!("Export annulé."),
                ExportOutcome::Failed { error } => println!("Échec de l'export : {error}"),
            }
        }
    }

    Ok(())
}

/// Rapport pré-rempli avec les valeurs par défaut de la checklist, daté du
/// jour, pour le parc actuel du client.
fn prefilled_report(
    client_id: &str,
    technician: &str,
    workstations: &[tekparc_core::models::Workstation],
) -> MaintenanceReport {
    let today = time::OffsetDateTime::now_utc()
        .date()
        .format(time::macros::format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "1970-01-01".to_string());

    MaintenanceReport {
        id: None,
        client_id: client_id.to_string(),
        date: today,
        technician: technician.to_string(),
        tablets_check: CheckState::NotChecked,
        global_observations: None,
        workstations: workstations
            .iter()
            .map(|ws| WorkstationReport {
                workstation_id: ws.id.clone(),
                workstation_name: ws.name.clone(),
                nas_access: true,
                windows_updates: true,
                hdd_health: HddHealth::Bon,
                hdd_hours: None,
                office_access: true,
                event_logs: true,
                antivirus: AntivirusStatus::RAS,
                veeam_backup: CheckState::NotChecked,
                rdx_check: CheckState::NotChecked,
                observations: None,
            })
            .collect(),
    }
}
