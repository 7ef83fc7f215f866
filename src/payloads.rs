use crate::fs::FileSpec;

/// 默认写入引导盘的文件
pub fn default_files() -> Vec<FileSpec> {
    vec![
        FileSpec::new("hello.txt", "Hello from Chocola!\n"),
        FileSpec::new(
            "readme.txt",
            "Chocola Ver0.1\n\
             A simple hobby operating system.\n\
             Built with NASM and GCC.\n",
        ),
        FileSpec::new(
            "help.txt",
            "Available commands:\n  \
             help       Show this help\n  \
             ver        Show version\n  \
             clear      Clear screen\n  \
             echo ..    Echo text\n  \
             uptime     Show uptime\n  \
             dir / ls   List files\n  \
             type FILE  Display file\n  \
             cat FILE   Display file\n",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_files_fit_one_sector_each() {
        let files = default_files();
        assert_eq!(files.len(), 3);
        assert_eq!(files[0].content, b"Hello from Chocola!\n");
        assert!(files[2].content.starts_with(b"Available commands:\n  help "));
        assert!(files.iter().all(|f| f.content.is_ascii() && f.content.len() <= 512));
    }
}
