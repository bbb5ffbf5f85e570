/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::fs::{self,File,OpenOptions};
use std::io::{self,Read,Seek,SeekFrom,Write,ErrorKind};
use std::path::{Path,PathBuf};

use crate::io_error;

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn filename<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().file_name().and_then(|ostr| ostr.to_str())
}

/// check if dir pathname exists and is writable, try to create dir otherwise
pub fn ensure_writable_dir (path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        let md = fs::metadata(&path)?;
        if md.permissions().readonly() {
            Err(io_error!(ErrorKind::PermissionDenied, "output_dir {:?} not writable", &path))
        } else {
            Ok(())
        }

    } else {
        fs::create_dir_all(path)
    }
}

pub fn file_length <P: AsRef<Path>> (path: P) -> Option<u64> {
    fs::metadata(path).ok().map( |meta| meta.len() )
}

/// true if there is no file at `path` or if it has zero length
pub fn is_empty_or_missing <P: AsRef<Path>> (path: P) -> bool {
    file_length(path).map( |len| len == 0).unwrap_or(true)
}

/// append the complete `data` buffer to the file at `path` (creating it if required), then flush and sync
/// the file data before returning. The buffer is written with a single `write_all` so that callers can
/// treat each call as one record
pub fn append_synced (path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(data)?;
    file.flush()?;
    file.sync_data()
}

/// cut off an unterminated last line of a line oriented file, i.e. a row that was only partially written
/// before the process died. Returns the number of removed bytes (0 if the file is missing, empty or
/// ends with a newline). A file without any newline is truncated to zero length
pub fn truncate_partial_line (path: impl AsRef<Path>) -> Result<u64> {
    let mut file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e)
    };

    let len = file.metadata()?.len();
    let mut buf = [0u8; 4096];
    let mut pos = len;
    let mut keep = 0;

    while pos > 0 {
        let n = pos.min( buf.len() as u64) as usize;
        let start = pos - n as u64;
        file.seek( SeekFrom::Start(start))?;
        file.read_exact( &mut buf[..n])?;

        if let Some(i) = buf[..n].iter().rposition(|&b| b == b'\n') {
            keep = start + i as u64 + 1;
            break;
        }
        pos = start;
    }

    if keep < len {
        file.set_len(keep)?;
        file.sync_data()?;
    }
    Ok(len - keep)
}

/// replace the file at `path` with `data`. The data is first written and synced to a sibling temp file
/// which is then renamed, i.e. the previous file contents stay intact if any step before the rename fails
pub fn write_file_replacing (path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = sibling_tmp_path(path)?;

    let res = {
        let mut file = File::create(&tmp_path)?;
        file.write_all(data)
            .and_then( |_| file.flush())
            .and_then( |_| file.sync_all())
    };

    match res {
        Ok(()) => fs::rename( &tmp_path, path),
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

fn sibling_tmp_path (path: &Path) -> Result<PathBuf> {
    let fname = filename(&path)
        .ok_or_else(|| io_error!(ErrorKind::InvalidInput, "not a valid filename {:?}", path))?;
    Ok( path.with_file_name( format!(".{fname}.tmp")) )
}
