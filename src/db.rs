//! Salsa データベース定義

/// Form translation のデータベーストレイト
#[salsa::db]
pub trait FormDatabase: salsa::Database {}

/// Form translation データベースの実装
#[salsa::db]
#[derive(Default, Clone)]
pub struct FormDatabaseImpl {
    /// Salsa のストレージ
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for FormDatabaseImpl {}

#[salsa::db]
impl FormDatabase for FormDatabaseImpl {}

impl std::fmt::Debug for FormDatabaseImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormDatabaseImpl").finish_non_exhaustive()
    }
}
