//! # トークンストア
//!
//! 認証トークンの永続化を担う。保存するのはトークンだけで、キーは
//! [`TOKEN_KEY`]（`auth_token`）の 1 つ。ユーザー情報はメモリ上にのみ持つ。
//!
//! - [`MemoryTokenStore`]: プロセス内だけで保持（テスト・一時利用）
//! - [`FileTokenStore`]: JSON ファイルに保存し、再起動後も復元できる

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use thiserror::Error;

/// トークンを保存するキー
pub const TOKEN_KEY: &str = "auth_token";

/// トークンストアのエラー
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("トークンファイルの入出力に失敗しました: {0}")]
    Io(#[from] io::Error),

    #[error("トークンファイルの形式が不正です: {0}")]
    Format(#[from] serde_json::Error),
}

/// トークンストア
///
/// 読み書きはリクエストの直前とログイン・ログアウト時だけなので同期 API とする。
pub trait TokenStore: Send + Sync {
    /// 保存済みのトークンを読み出す（無ければ `None`）
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// トークンを保存する（既存の値は上書き）
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// トークンを削除する
    ///
    /// 保存されていなくても成功とする。
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// メモリ上のトークンストア
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// トークンを保存済みの状態で作成する
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock() = None;
        Ok(())
    }
}

/// JSON ファイルのトークンストア
///
/// ファイルは `{"auth_token": "..."}` 形式のキー・値マップ。
/// 他のキーがあれば保持したまま `auth_token` だけを書き換える。
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, TokenStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let text = serde_json::to_string_pretty(entries)?;
        let mut file = open_private(&self.path)?;
        file.write_all(text.as_bytes())?;
        // 既存ファイルは作成時のモードが効かない
        restrict_permissions(&self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        Ok(entries.remove(TOKEN_KEY).filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

/// 所有者だけが読み書きできるモードで書き込み用に開く
///
/// 新規作成時は最初から 0600 で作られる。
#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// トークンファイルを所有者だけが読み書きできるようにする
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
