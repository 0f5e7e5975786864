use std::fs;
use tempfile::TempDir;

/// Fixture tree with nested, empty and mixed-case entries.
pub fn create_test_structure() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("dir1/subdir1")).unwrap();
    fs::create_dir_all(root.join("dir2")).unwrap();
    fs::create_dir_all(root.join("empty_dir")).unwrap();
    fs::create_dir_all(root.join("deep/nested/structure/here")).unwrap();

    fs::write(root.join("file1.txt"), b"content1").unwrap();
    fs::write(root.join("file2.log"), b"content2").unwrap();
    fs::write(root.join("dir1/file3.txt"), b"content3").unwrap();
    fs::write(root.join("dir1/subdir1/file4.TXT"), b"content4").unwrap();
    fs::write(root.join("dir2/passwords.xlsx"), b"content5").unwrap();
    fs::write(root.join("deep/nested/structure/here/file7.txt"), b"content7").unwrap();
    fs::write(root.join("empty_file.txt"), b"").unwrap();

    temp_dir
}
