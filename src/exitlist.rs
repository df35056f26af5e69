use crate::Error;
use lazy_static::lazy_static;
use regex::bytes::Regex;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use std::collections::BTreeMap;
use std::collections::HashSet;

/// Extracts the address from an `ExitAddress` line of a saved
/// <https://check.torproject.org/exit-addresses> listing. A record looks like:
///
/// ```text
/// ExitNode FDE193D27BA55D9AC82EC766E4AABF1699EB0C40
/// Published 2016-02-25 13:45:01
/// LastStatus 2016-02-25 14:03:22
/// ExitAddress 178.209.50.151 2016-02-25 14:07:28
/// ```
///
/// The address is returned verbatim, no validation is done.
pub fn parse_exit_address(line: &str) -> Option<&str> {
    parse_exit_address_bytes(line.as_bytes()).and_then(|ip| std::str::from_utf8(ip).ok())
}

/// Same as [`parse_exit_address`] over raw bytes. The address runs up to the
/// next ASCII whitespace and may hold any other byte, valid UTF-8 or not.
pub fn parse_exit_address_bytes(line: &[u8]) -> Option<&[u8]> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^ExitAddress ((?-u:\S)+)").expect("Not possible");
    }
    RE.captures(line).and_then(|v| v.get(1)).map(|m| m.as_bytes())
}

/// Addresses seen so far, each with the indices of the files that listed it.
/// A file index is recorded at most once per address.
#[derive(Debug, Default)]
pub struct ObservationTable {
    inner: BTreeMap<Vec<u8>, Vec<usize>>,
    files: usize,
}

impl ObservationTable {
    pub fn new() -> Self {
        ObservationTable {
            inner: BTreeMap::new(),
            files: 0,
        }
    }

    /// Reads `path` as file number `index`. Indices must arrive as 0, 1, 2...
    pub fn ingest(&mut self, index: usize, path: &Path) -> Result<usize, Error> {
        if index != self.files {
            return Err(Error::OutOfOrder {
                path: path.to_path_buf(),
                index,
                expected: self.files,
            });
        }
        let read_err = |source| Error::Read {
            path: path.to_path_buf(),
            source,
        };
        let f = File::open(path).map_err(read_err)?;
        let found = self.ingest_reader(BufReader::new(f)).map_err(read_err)?;
        tracing::debug!(index, path = %path.display(), addresses = found, "ingested exit list");
        Ok(found)
    }

    /// Scans `reader` as the next file and returns how many distinct addresses
    /// it listed. The file counts towards `file_count` only if the whole scan
    /// succeeds; on error the table may still hold its earlier addresses.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let index = self.files;
        let mut dup = HashSet::new();
        for line in reader.split(b'\n') {
            let line = line?;
            if let Some(ip) = parse_exit_address_bytes(&line) {
                if dup.insert(ip.to_vec()) {
                    self.inner.entry(ip.to_vec()).or_default().push(index);
                }
            }
        }
        self.files += 1;
        Ok(dup.len())
    }

    /// Number of files ingested, which is the height of the rendered image.
    pub fn file_count(&self) -> usize {
        self.files
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get<K: AsRef<[u8]>>(&self, ip: K) -> Option<&[usize]> {
        self.inner.get(ip.as_ref()).map(|v| v.as_slice())
    }

    /// Entries in column order: most recently seen first, then seen in the
    /// most files, then by address.
    pub fn sorted(&self) -> Vec<(&[u8], &[usize])> {
        let mut keys: Vec<(&[u8], &[usize])> = self
            .inner
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();
        keys.sort_by(|(ka, a), (kb, b)| {
            b.last()
                .cmp(&a.last())
                .then_with(|| b.len().cmp(&a.len()))
                .then_with(|| ka.cmp(kb))
        });
        keys
    }
}

impl Display for ObservationTable {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        for (ip, files) in self.sorted() {
            let files: Vec<String> = files.iter().map(|i| i.to_string()).collect();
            writeln!(f, "{}\t{}", String::from_utf8_lossy(ip), files.join(","))?;
        }
        Ok(())
    }
}
