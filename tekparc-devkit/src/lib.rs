/*!
# Tekparc DevKit - Stubs et Utilitaires de Test

Bibliothèque facilitant les tests des composants Tekparc avec:
- Doublures des collaborateurs d'export (moteur PDF, invite de sauvegarde)
- Magasins temporaires jetables
- Constructeurs de clients et rapports d'exemple
*/

pub mod pdf_stub;
pub mod test_utils;

pub use pdf_stub::{StubPdfEngine, StubSavePrompt};
pub use test_utils::TestStore;
