//! Simple file-backed [`KeyValueStore`] for lightweight single-process deployments.

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	store::{KeyValueStore, StoreError, StoreFuture},
};

type Snapshot = BTreeMap<String, JsonValue>;

/// Persists every key to a single JSON object file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileStore {
	/// Opens the store at `path`, loading the existing snapshot when there is one.
	///
	/// Missing parent directories are created; a missing or empty file starts empty.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(backend("create directory", parent))?;
		}

		let snapshot = match fs::read(&path) {
			Ok(bytes) if bytes.is_empty() => Snapshot::new(),
			Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("{} is not a JSON object snapshot: {e}", path.display()),
			})?,
			Err(e) if e.kind() == ErrorKind::NotFound => Snapshot::new(),
			Err(e) => return Err(backend("read", &path)(e)),
		};

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Writes `contents` to a sibling temp file, then renames it over the snapshot.
	fn persist(&self, contents: &Snapshot) -> Result<(), StoreError> {
		let bytes = serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
			message: format!("Snapshot cannot be encoded: {e}"),
		})?;
		let staging = self.path.with_extension("tmp");
		let mut file = File::create(&staging).map_err(backend("create", &staging))?;

		file.write_all(&bytes).map_err(backend("write", &staging))?;
		file.sync_all().map_err(backend("sync", &staging))?;
		drop(file);

		fs::rename(&staging, &self.path).map_err(backend("replace", &self.path))
	}
}
impl KeyValueStore for FileStore {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<JsonValue>> {
		Box::pin(async move { Ok(self.inner.read().get(key).cloned()) })
	}

	fn set<'a>(&'a self, key: &'a str, value: JsonValue) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let previous = guard.insert(key.to_owned(), value);

			self.persist(&guard).inspect_err(|_| restore(&mut guard, key, previous))
		})
	}

	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<JsonValue>> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let previous = guard.remove(key);

			if previous.is_some() {
				self.persist(&guard).inspect_err(|_| restore(&mut guard, key, previous.clone()))?;
			}

			Ok(previous)
		})
	}
}

/// Puts `key` back to the value it held before a mutation whose write failed.
fn restore(snapshot: &mut Snapshot, key: &str, previous: Option<JsonValue>) {
	match previous {
		Some(value) => snapshot.insert(key.to_owned(), value),
		None => snapshot.remove(key),
	};
}

fn backend(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
	let path = path.display().to_string();

	move |e| StoreError::Backend { message: format!("Failed to {action} {path}: {e}") }
}
