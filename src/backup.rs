use std::{
    ffi::OsString,
    fs::{self, File},
    io::{Error, Write},
    path::{Path, PathBuf},
};

use crate::common::err_invalid_input;

pub const DEFAULT_SUFFIX: &str = ".bak";

/// `main.rs` with suffix `.bak` backs up to `main.rs.bak`
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Copies the original bytes next to `path`, overwriting an older backup.
pub fn write_backup(path: &Path, original: &[u8], suffix: &str) -> Result<PathBuf, Error> {
    let backup = backup_path(path, suffix);
    if backup == path {
        return Err(err_invalid_input("backup suffix must not be empty"));
    }
    fs::write(&backup, original)?;
    Ok(backup)
}

/// Replaces the contents of `path` without ever leaving it half written. The new
/// contents go to a hidden sibling file first, which is then renamed over `path`.
/// On failure the sibling is removed and `path` is untouched.
///
/// Symlinks are followed: the file they point at is replaced and the link stays.
pub fn replace(path: &Path, contents: &[u8]) -> Result<(), Error> {
    let target = fs::canonicalize(path)?;
    let tmp = temp_path(&target)?;
    let result =
        write_temp(&target, &tmp, contents).and_then(|_| fs::rename(&tmp, &target));
    if result.is_err() {
        if let Err(err) = fs::remove_file(&tmp) {
            log::debug!("could not remove {}: {}", tmp.display(), err);
        }
    }
    result
}

fn temp_path(path: &Path) -> Result<PathBuf, Error> {
    let name = path
        .file_name()
        .ok_or_else(|| err_invalid_input(format!("{} does not name a file", path.display())))?;
    let mut tmp_name = OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(format!(".lcstrip-{}.tmp", std::process::id()));
    Ok(path.with_file_name(tmp_name))
}

fn write_temp(path: &Path, tmp: &Path, contents: &[u8]) -> Result<(), Error> {
    let mut file = File::create(tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    // keep the mode bits of the file being replaced
    fs::set_permissions(tmp, fs::metadata(path)?.permissions())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        io::Error,
        path::{Path, PathBuf},
    };

    use super::{backup_path, replace, write_backup, DEFAULT_SUFFIX};

    fn scratch_dir(name: &str) -> Result<PathBuf, Error> {
        let dir = std::env::temp_dir().join(format!("lcstrip-backup-{}-{}", name, std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    #[test]
    fn suffix_appended_to_extension() {
        assert_eq!(
            PathBuf::from("src/main.rs.bak"),
            backup_path(Path::new("src/main.rs"), DEFAULT_SUFFIX)
        );
        assert_eq!(
            PathBuf::from("Makefile.orig"),
            backup_path(Path::new("Makefile"), ".orig")
        );
    }

    #[test]
    fn backup_is_byte_exact() -> Result<(), Error> {
        let dir = scratch_dir("exact")?;
        let path = dir.join("lib.rs");
        let original: &[u8] = b"fn x() {} // \xff not utf8\r\n";
        fs::write(&path, original)?;
        let backup = write_backup(&path, original, DEFAULT_SUFFIX)?;
        assert_eq!(dir.join("lib.rs.bak"), backup);
        assert_eq!(original, fs::read(&backup)?.as_slice());
        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn empty_suffix_rejected() -> Result<(), Error> {
        let dir = scratch_dir("empty")?;
        let path = dir.join("lib.rs");
        fs::write(&path, "x")?;
        assert!(write_backup(&path, b"x", "").is_err());
        assert_eq!("x", fs::read_to_string(&path)?);
        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn replace_leaves_no_temp() -> Result<(), Error> {
        let dir = scratch_dir("replace")?;
        let path = dir.join("main.c");
        fs::write(&path, "old // text\n")?;
        replace(&path, b"old\n")?;
        assert_eq!("old\n", fs::read_to_string(&path)?);
        let entries = fs::read_dir(&dir)?.count();
        assert_eq!(1, entries);
        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn replace_writes_through_symlink() -> Result<(), Error> {
        let dir = scratch_dir("symlink")?;
        let real = dir.join("real.rs");
        let link = dir.join("link.rs");
        fs::write(&real, "a // b\n")?;
        std::os::unix::fs::symlink(&real, &link)?;
        replace(&link, b"a\n")?;
        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!("a\n", fs::read_to_string(&real)?);
        assert_eq!(2, fs::read_dir(&dir)?.count());
        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn replace_missing_target_fails_cleanly() -> Result<(), Error> {
        let dir = scratch_dir("missing")?;
        let path = dir.join("gone.c");
        assert!(replace(&path, b"new\n").is_err());
        assert_eq!(0, fs::read_dir(&dir)?.count());
        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
