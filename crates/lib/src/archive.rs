//! Archive (NAR) serialization of file trees.
//!
//! Every token is a string: a little-endian `u64` length, the bytes, then zero
//! padding up to a multiple of 8. A dump is the magic followed by one node:
//!
//! ```text
//! ( type regular [executable ""] contents <data> )
//! ( type symlink target <target> )
//! ( type directory [entry ( name <name> node <node> )]* )
//! ```

use std::io::{self, Write};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::accessor::{FileKind, PosixAccessor, SourceAccessor};
use crate::canon_path::CanonPath;
use crate::consts::NAR_MAGIC;
use crate::{Error, Result};

/// Serialize the tree at `path` in `accessor` into `sink`.
pub fn dump(accessor: &dyn SourceAccessor, path: &CanonPath, sink: &mut dyn Write) -> Result<()> {
  let mut out = ArchiveWriter { sink };
  out.str(NAR_MAGIC)?;
  dump_node(accessor, path, &mut out)
}

/// Serialize a real on-disk path.
pub fn dump_path(path: &Path, sink: &mut dyn Write) -> Result<()> {
  dump(&PosixAccessor::new(path), &CanonPath::root(), sink)
}

/// `sha256:<hex>` digest of the archive of a real path.
pub fn nar_hash(path: &Path) -> Result<String> {
  let mut hasher = NarHasher::new();
  dump_path(path, &mut hasher)?;
  Ok(hasher.finish())
}

/// A sink that digests an archive stream instead of storing it.
#[derive(Default)]
pub struct NarHasher(Sha256);

impl NarHasher {
  pub fn new() -> Self {
    Self::default()
  }

  /// The digest of everything written so far, as `sha256:<hex>`.
  pub fn finish(self) -> String {
    format!("sha256:{}", hex::encode(self.0.finalize()))
  }
}

impl Write for NarHasher {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.update(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

struct ArchiveWriter<'a> {
  sink: &'a mut dyn Write,
}

impl ArchiveWriter<'_> {
  fn raw(&mut self, bytes: &[u8]) -> Result<()> {
    self.sink.write_all(bytes).map_err(|e| Error::io("<archive sink>", e))
  }

  fn int(&mut self, n: u64) -> Result<()> {
    self.raw(&n.to_le_bytes())
  }

  fn pad(&mut self, n: u64) -> Result<()> {
    let rem = (n % 8) as usize;
    if rem != 0 {
      self.raw(&[0u8; 8][..8 - rem])?;
    }
    Ok(())
  }

  fn bytes(&mut self, bytes: &[u8]) -> Result<()> {
    self.int(bytes.len() as u64)?;
    self.raw(bytes)?;
    self.pad(bytes.len() as u64)
  }

  fn str(&mut self, s: &str) -> Result<()> {
    self.bytes(s.as_bytes())
  }
}

fn dump_node(accessor: &dyn SourceAccessor, path: &CanonPath, out: &mut ArchiveWriter<'_>) -> Result<()> {
  let stat = accessor.lstat(path)?;
  out.str("(")?;

  match stat.kind {
    FileKind::Regular => {
      out.str("type")?;
      out.str("regular")?;
      if stat.is_executable {
        out.str("executable")?;
        out.str("")?;
      }
      out.str("contents")?;
      dump_contents(accessor, path, stat.size.unwrap_or(0), out)?;
    }
    FileKind::Symlink => {
      out.str("type")?;
      out.str("symlink")?;
      out.str("target")?;
      out.str(&accessor.read_link(path)?)?;
    }
    FileKind::Directory => {
      out.str("type")?;
      out.str("directory")?;
      // BTreeMap keys are already in byte order.
      for name in accessor.read_directory(path)?.keys() {
        let mut child = path.clone();
        child.push(name);
        out.str("entry")?;
        out.str("(")?;
        out.str("name")?;
        out.str(name)?;
        out.str("node")?;
        dump_node(accessor, &child, out)?;
        out.str(")")?;
      }
    }
    FileKind::Misc => {
      return Err(Error::io(
        path.abs(),
        io::Error::new(io::ErrorKind::Unsupported, "file has an unsupported type"),
      ));
    }
  }

  out.str(")")
}

fn dump_contents(
  accessor: &dyn SourceAccessor,
  path: &CanonPath,
  expected: u64,
  out: &mut ArchiveWriter<'_>,
) -> Result<()> {
  out.int(expected)?;
  let mut counter = CountingSink {
    inner: &mut *out.sink,
    written: 0,
  };
  accessor.read_file(path, &mut counter, &mut |_: u64| {})?;
  let written = counter.written;

  if written != expected {
    return Err(Error::io(
      path.abs(),
      io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("file changed while archiving: expected {} bytes, got {}", expected, written),
      ),
    ));
  }
  out.pad(written)
}

struct CountingSink<'a> {
  inner: &'a mut dyn Write,
  written: u64,
}

impl Write for CountingSink<'_> {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    let n = self.inner.write(buf)?;
    self.written += n as u64;
    Ok(n)
  }

  fn flush(&mut self) -> io::Result<()> {
    self.inner.flush()
  }
}
