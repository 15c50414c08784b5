pub mod calculations;
pub mod contact;
pub mod db;
pub mod editor;
pub mod models;
pub mod print;

pub use db::repository::{Collection, DocumentId, DocumentRepository, RepositoryError};
pub use editor::{DocumentEditorState, EditorError, EditorPhase, FieldUpdate, PersistRequest};
pub use models::*;
