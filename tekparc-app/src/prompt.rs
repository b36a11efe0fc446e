//! Invite de destination du PDF côté terminal.
//!
//! Même contrat que la boîte de dialogue d'enregistrement d'un environnement
//! graphique : une réponse vide vaut annulation, pas erreur.

use std::io::{self, Write};
use std::path::PathBuf;
use tekparc_core::export::{ExportError, SavePrompt};

pub enum CliPrompt {
    /// Destination imposée par `--out`, aucune interaction
    Preset(PathBuf),
    /// Saisie au terminal, proposition de nom par défaut
    Interactive,
}

impl SavePrompt for CliPrompt {
    fn choose_destination(&self, suggested_name: &str) -> Result<Option<PathBuf>, ExportError> {
        match self {
            CliPrompt::Preset(path) => Ok(Some(path.clone())),
            CliPrompt::Interactive => {
                print!("Destination du PDF [{suggested_name}] (vide = annuler) : ");
                io::stdout().flush()?;
                let mut line = String::new();
                io::stdin().read_line(&mut line)?;
                let answer = line.trim();
                if answer.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(PathBuf::from(answer)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_prompt_returns_fixed_path() {
        let prompt = CliPrompt::Preset(PathBuf::from("/tmp/rapport.pdf"));
        let chosen = prompt.choose_destination("rapport_a_2024-03-15.pdf").unwrap();
        assert_eq!(chosen, Some(PathBuf::from("/tmp/rapport.pdf")));
    }
}
