//! Open containers.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{SecondsFormat, Utc};
use lofardal_store::{FileAccessProps, Mode, NativeStore, StorageBackend};
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::node::{FileContext, Group, Node};
use crate::schema::{self, NodeKind};
use crate::version::{Version, CURRENT_FORMAT_VERSION};

// ---------------------------------------------------------------------------
// FileCreateOptions
// ---------------------------------------------------------------------------

/// Options for creating a new file.
#[derive(Debug, Clone)]
pub struct FileCreateOptions {
    /// Fail if the file already exists instead of truncating it.
    pub exclusive: bool,
    /// Format version stamped into `DOC_VERSION`.
    pub version: Version,
    /// `FILETYPE` tag; defaults to the schema default of the file kind.
    pub file_type: Option<String>,
    /// Directory relative external raw data paths resolve against.
    pub external_base: Option<PathBuf>,
}

impl Default for FileCreateOptions {
    fn default() -> Self {
        Self {
            exclusive: false,
            version: CURRENT_FORMAT_VERSION,
            file_type: None,
            external_base: None,
        }
    }
}

impl FileCreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn file_type(mut self, tag: impl Into<String>) -> Self {
        self.file_type = Some(tag.into());
        self
    }

    pub fn external_base(mut self, dir: impl Into<PathBuf>) -> Self {
        self.external_base = Some(dir.into());
        self
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// An open LOFAR file.
///
/// Node handles derived from a file hold only a weak reference to it; once
/// the file is dropped they report [`Error::Closed`]. Writable files are
/// flushed on drop unless opened with flush-on-drop disabled.
pub struct File {
    ctx: Rc<FileContext>,
    root_kind: NodeKind,
    flush_on_drop: bool,
}

impl File {
    /// Open an existing file, or create one for [`Mode::Create`] and
    /// [`Mode::CreateExclusive`].
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> Result<File> {
        Self::open_as(path.as_ref(), FileAccessProps::new(mode), NodeKind::Root)
    }

    /// Open with explicit access properties.
    ///
    /// Disabling flush-on-drop gives deferred writes: nothing reaches the
    /// file until [`File::flush`] or [`File::close`].
    pub fn open_with(path: impl AsRef<Path>, props: FileAccessProps) -> Result<File> {
        Self::open_as(path.as_ref(), props, NodeKind::Root)
    }

    /// Create a file and populate the mandatory root attributes.
    pub fn create(path: impl AsRef<Path>, options: &FileCreateOptions) -> Result<File> {
        Self::create_as(path.as_ref(), options, NodeKind::Root)
    }

    /// Wrap an already open backend. The version is read from the file.
    pub fn from_backend(store: Box<dyn StorageBackend>, filename: &str) -> File {
        Self::from_backend_as(store, filename, NodeKind::Root)
    }

    pub(crate) fn from_backend_as(
        store: Box<dyn StorageBackend>,
        filename: &str,
        root_kind: NodeKind,
    ) -> File {
        let file = File {
            ctx: Rc::new(FileContext::new(store, filename.to_string())),
            root_kind,
            flush_on_drop: true,
        };
        file.ctx.version.set(file.read_version());
        file
    }

    pub(crate) fn open_as(path: &Path, props: FileAccessProps, root_kind: NodeKind) -> Result<File> {
        if props.mode.is_create() {
            let mut options = FileCreateOptions {
                exclusive: props.mode == Mode::CreateExclusive,
                ..FileCreateOptions::default()
            };
            options.external_base = props.external_base;
            let mut file = Self::create_as(path, &options, root_kind)?;
            file.flush_on_drop = props.flush_on_drop;
            return Ok(file);
        }
        let flush_on_drop = props.flush_on_drop;
        let store = NativeStore::open(path, props.no_flush_on_drop())
            .map_err(|e| Error::store(&path.display().to_string(), e))?;
        let mut file = Self::from_backend_as(Box::new(store), &file_name(path), root_kind);
        file.flush_on_drop = flush_on_drop;
        debug!(
            path = %path.display(),
            mode = ?file.mode(),
            version = %file.file_version(),
            "opened file"
        );
        Ok(file)
    }

    pub(crate) fn create_as(
        path: &Path,
        options: &FileCreateOptions,
        root_kind: NodeKind,
    ) -> Result<File> {
        let mode = if options.exclusive {
            Mode::CreateExclusive
        } else {
            Mode::Create
        };
        let mut props = FileAccessProps::new(mode).no_flush_on_drop();
        if let Some(base) = &options.external_base {
            props = props.external_base(base);
        }
        let store = NativeStore::open(path, props)
            .map_err(|e| Error::store(&path.display().to_string(), e))?;
        let mut file = Self::from_backend_as(Box::new(store), &file_name(path), root_kind);

        if let Err(e) = file.populate(options).and_then(|()| file.flush()) {
            file.flush_on_drop = false;
            drop(file);
            if let Err(rm) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %rm, "could not remove partially created file");
            }
            return Err(e);
        }
        debug!(path = %path.display(), kind = %root_kind, version = %options.version, "created file");
        Ok(file)
    }

    /// Write the attributes every new file carries.
    fn populate(&self, options: &FileCreateOptions) -> Result<()> {
        let root = self.root();
        root.write_group_type()?;
        root.attribute::<String>("FILENAME")
            .set(self.ctx.filename.clone())?;
        root.attribute::<String>("FILEDATE")
            .set(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))?;
        let file_type = options.file_type.clone().or_else(|| {
            schema::definition_for(self.root_kind, "FILETYPE")
                .and_then(|e| e.default)
                .and_then(|d| match d {
                    schema::DefaultValue::Str(s) => Some(s.to_string()),
                    _ => None,
                })
        });
        if let Some(tag) = file_type {
            root.attribute::<String>("FILETYPE").set(tag)?;
        }
        root.attribute::<String>("TELESCOPE").create()?;
        self.set_file_version(options.version)
    }

    fn read_version(&self) -> Version {
        match self.root().attribute::<String>("DOC_VERSION").get() {
            Ok(text) => text.parse().unwrap_or_else(|_| {
                warn!(file = %self.ctx.filename, doc_version = %text, "unparsable DOC_VERSION");
                Version::default()
            }),
            Err(_) => Version::default(),
        }
    }

    /// Handle on the root group.
    pub fn root(&self) -> Group {
        Group::from(Node::new(
            Rc::downgrade(&self.ctx),
            "/".to_string(),
            self.root_kind,
        ))
    }

    /// Base name of the file.
    pub fn filename(&self) -> &str {
        &self.ctx.filename
    }

    pub fn mode(&self) -> Mode {
        self.ctx.mode
    }

    pub fn can_write(&self) -> bool {
        self.ctx.mode.is_writable()
    }

    /// Filesystem location, if the file has one.
    pub fn location(&self) -> Option<PathBuf> {
        self.ctx.store.borrow().location().map(Path::to_path_buf)
    }

    /// Format version read from `DOC_VERSION`; 0.0.0 when absent.
    pub fn file_version(&self) -> Version {
        self.ctx.version.get()
    }

    /// Rewrite `DOC_VERSION` and the cached version.
    pub fn set_file_version(&self, version: Version) -> Result<()> {
        self.root()
            .attribute::<String>("DOC_VERSION")
            .set(version.to_string())?;
        self.ctx.version.set(version);
        Ok(())
    }

    /// Write pending changes to stable storage. Idempotent.
    pub fn flush(&self) -> Result<()> {
        let mut store = self.ctx.store.borrow_mut();
        store
            .flush()
            .map_err(|e| Error::store(&self.ctx.filename, e))?;
        debug!(file = %self.ctx.filename, "flushed file");
        Ok(())
    }

    /// Flush and close.
    pub fn close(mut self) -> Result<()> {
        self.flush_on_drop = false;
        if self.can_write() {
            self.flush()?;
        }
        Ok(())
    }
}

impl Drop for File {
    fn drop(&mut self) {
        if !(self.flush_on_drop && self.ctx.mode.is_writable()) {
            return;
        }
        let Ok(mut store) = self.ctx.store.try_borrow_mut() else {
            error!(file = %self.ctx.filename, "file busy during close, changes not flushed");
            return;
        };
        if let Err(e) = store.flush() {
            error!(file = %self.ctx.filename, error = %e, "failed to flush file on close");
        }
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("filename", &self.ctx.filename)
            .field("mode", &self.ctx.mode)
            .field("kind", &self.root_kind)
            .field("version", &self.ctx.version.get())
            .finish()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
