use std::io::Result;

use flat_fs::disk::BlockDevice;
use indicatif::ProgressBar;

/// 给任意块设备套上进度条，按写入字节数推进
pub struct ProgressDisk<D> {
    inner: D,
    bar: ProgressBar,
}

impl<D: BlockDevice> ProgressDisk<D> {
    pub fn new(inner: D, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }

    pub fn finish(self, msg: &'static str) -> D {
        self.bar.finish_with_message(msg);
        self.inner
    }
}

impl<D: BlockDevice> BlockDevice for ProgressDisk<D> {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<()> {
        self.inner.write_at(offset, buf)?;
        self.bar.inc(buf.len() as u64);
        Ok(())
    }

    fn capacity(&self) -> u64 {
        self.inner.capacity()
    }
}
