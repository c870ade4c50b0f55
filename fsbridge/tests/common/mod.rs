//! Common test utilities: in-memory block devices and firmware doubles

#![allow(dead_code)]

use fsbridge::device::Device;
use fsbridge::firmware::block::BlockDiskIo;
use fsbridge::firmware::heap::HeapPool;
use fsbridge::firmware::{
    ConsoleIn, ConsoleOut, DiskIo, Firmware, ImageControl, InputKey, PoolServices, VariableStore,
};
use fsbridge::fs::{DirHook, DirhookInfo, FsDriver};
use fsbridge::{ErrorCode, Runtime, StaticModule, Status};
use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::ptr::NonNull;
use uguid::Guid;

/// In-memory block device for testing
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub data: Vec<u8>,
    pub block_size: usize,
}

impl MemoryBlockDevice {
    /// Create a new memory block device from raw data (512-byte blocks)
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_block_size(data, 512)
    }

    /// Create a device with a specific block size
    pub fn with_block_size(data: Vec<u8>, block_size: usize) -> Self {
        Self { data, block_size }
    }

    /// Device whose byte `i` is `i % 251`, easy to check at any offset
    pub fn patterned(len: usize, block_size: usize) -> Self {
        let data = (0..len).map(|i| (i % 251) as u8).collect();
        Self::with_block_size(data, block_size)
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size as u32).expect("valid block size")
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok((self.data.len() / self.block_size) as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + dst.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        dst.copy_from_slice(&self.data[offset..offset + dst.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + src.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "write beyond end of device",
            ));
        }
        self.data[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Disk I/O double counting reads, optionally failing all of them
pub struct CountingDiskIo<D: DiskIo> {
    pub inner: D,
    pub reads: Cell<usize>,
    pub fail: Cell<bool>,
}

impl<D: DiskIo> CountingDiskIo<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            reads: Cell::new(0),
            fail: Cell::new(false),
        }
    }
}

impl<D: DiskIo> DiskIo for CountingDiskIo<D> {
    fn read_disk(&self, media_id: u32, offset: u64, buffer: &mut [u8]) -> Result<(), Status> {
        self.reads.set(self.reads.get() + 1);
        if self.fail.get() {
            return Err(Status::DEVICE_ERROR);
        }
        self.inner.read_disk(media_id, offset, buffer)
    }
}

/// Byte-addressed disk over an in-memory device
pub fn memory_disk(data: Vec<u8>) -> CountingDiskIo<BlockDiskIo<MemoryBlockDevice>> {
    CountingDiskIo::new(BlockDiskIo::new(MemoryBlockDevice::new(data), 1))
}

/// Pool that tracks live allocations and can be told to fail
pub struct TestPool {
    heap: HeapPool,
    pub live: Cell<usize>,
    pub allocations: Cell<usize>,
    /// Number of further allocations to allow before failing
    pub fail_after: Cell<Option<usize>>,
}

impl TestPool {
    pub fn new() -> Self {
        let region = Box::leak(vec![0u8; 256 * 1024].into_boxed_slice());
        Self {
            heap: HeapPool::from_static(region),
            live: Cell::new(0),
            allocations: Cell::new(0),
            fail_after: Cell::new(None),
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.heap.stats().used
    }
}

impl PoolServices for TestPool {
    fn allocate_pool(&self, size: usize) -> Result<NonNull<u8>, Status> {
        match self.fail_after.get() {
            Some(0) => return Err(Status::OUT_OF_RESOURCES),
            Some(n) => self.fail_after.set(Some(n - 1)),
            None => {}
        }
        let ptr = self.heap.allocate_pool(size)?;
        self.live.set(self.live.get() + 1);
        self.allocations.set(self.allocations.get() + 1);
        Ok(ptr)
    }

    unsafe fn free_pool(&self, buffer: NonNull<u8>) -> Result<(), Status> {
        self.live.set(self.live.get() - 1);
        self.heap.free_pool(buffer)
    }
}

/// Console double: queued key events in, captured UTF-16 out
#[derive(Default)]
pub struct TestConsole {
    pub keys: RefCell<VecDeque<Result<InputKey, Status>>>,
    pub polls: Cell<usize>,
    pub output: RefCell<Vec<u16>>,
    pub chunks: Cell<usize>,
}

impl TestConsole {
    pub fn push_key(&self, c: char) {
        self.keys.borrow_mut().push_back(Ok(InputKey {
            scan_code: 0,
            unicode_char: c as u16,
        }));
    }

    pub fn push_status(&self, status: Status) {
        self.keys.borrow_mut().push_back(Err(status));
    }

    pub fn output_text(&self) -> String {
        String::from_utf16_lossy(&self.output.borrow())
    }
}

impl ConsoleIn for TestConsole {
    fn read_key_stroke(&self) -> Result<InputKey, Status> {
        self.polls.set(self.polls.get() + 1);
        self.keys
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(Status::NOT_READY))
    }
}

impl ConsoleOut for TestConsole {
    fn output_string(&self, text: &[u16]) -> Result<(), Status> {
        let (terminator, body) = text.split_last().ok_or(Status::INVALID_PARAMETER)?;
        assert_eq!(*terminator, 0, "console output must be NUL-terminated");
        self.output.borrow_mut().extend_from_slice(body);
        self.chunks.set(self.chunks.get() + 1);
        Ok(())
    }
}

/// Variable store double holding UTF-16 values
#[derive(Default)]
pub struct TestVariables {
    pub vars: RefCell<Vec<(Vec<u16>, Guid, Vec<u8>)>>,
    pub fail_with: Cell<Option<Status>>,
}

impl TestVariables {
    /// Store `value` as UTF-16 with a terminating NUL
    pub fn set(&self, name: &str, vendor: Guid, value: &str) {
        let mut raw = Vec::new();
        for unit in value.encode_utf16().chain(std::iter::once(0)) {
            raw.extend_from_slice(&unit.to_le_bytes());
        }
        self.set_raw(name, vendor, raw);
    }

    pub fn set_raw(&self, name: &str, vendor: Guid, raw: Vec<u8>) {
        let mut key: Vec<u16> = name.encode_utf16().collect();
        key.push(0);
        self.vars.borrow_mut().push((key, vendor, raw));
    }
}

impl VariableStore for TestVariables {
    fn get_variable(&self, name: &[u16], vendor: &Guid, data: &mut [u8]) -> Result<usize, Status> {
        if let Some(status) = self.fail_with.get() {
            return Err(status);
        }
        assert_eq!(name.last(), Some(&0), "variable name must be NUL-terminated");
        let vars = self.vars.borrow();
        let (_, _, value) = vars
            .iter()
            .find(|(n, g, _)| n.as_slice() == name && g == vendor)
            .ok_or(Status::NOT_FOUND)?;
        if value.len() > data.len() {
            return Err(Status::BUFFER_TOO_SMALL);
        }
        data[..value.len()].copy_from_slice(value);
        Ok(value.len())
    }
}

/// Image double: records the exit status, then refuses by panicking
#[derive(Default)]
pub struct TestImage {
    pub exit_status: Cell<Option<Status>>,
}

impl ImageControl for TestImage {
    fn exit(&self, status: Status) {
        self.exit_status.set(Some(status));
        panic!("image exit: {}", status);
    }
}

/// All firmware doubles together
pub struct TestFirmware {
    pub pool: TestPool,
    pub console: TestConsole,
    pub variables: TestVariables,
    pub image: TestImage,
}

impl TestFirmware {
    pub fn new() -> Self {
        Self {
            pool: TestPool::new(),
            console: TestConsole::default(),
            variables: TestVariables::default(),
            image: TestImage::default(),
        }
    }

    pub fn services(&self) -> Firmware<'_> {
        Firmware {
            pool: &self.pool,
            con_in: &self.console,
            con_out: &self.console,
            variables: &self.variables,
            image: &self.image,
        }
    }

    pub fn runtime(&self) -> Runtime<'_> {
        Runtime::new(self.services())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// A TOY FILESYSTEM DRIVER
// ═══════════════════════════════════════════════════════════════════════════
//
// Superblock in sector 2:
//   0x00  "TOYFS\0"   magic
//   0x08  u8          identifier length
//   0x10  ...         identifier bytes
//   0x80  u8          entry count
// Entry names are 16-byte NUL-padded records starting at sector 3.

pub const TOY_SUPERBLOCK_SECTOR: u64 = 2;
pub const TOY_MAGIC: &[u8; 6] = b"TOYFS\0";

/// Build a toy volume image with `uuid` and entries `names`
pub fn toy_image(uuid: &str, names: &[&str]) -> Vec<u8> {
    let mut data = vec![0u8; 16 * 512];
    let sb = TOY_SUPERBLOCK_SECTOR as usize * 512;
    data[sb..sb + 6].copy_from_slice(TOY_MAGIC);
    data[sb + 8] = uuid.len() as u8;
    data[sb + 0x10..sb + 0x10 + uuid.len()].copy_from_slice(uuid.as_bytes());
    data[sb + 0x80] = names.len() as u8;
    for (i, name) in names.iter().enumerate() {
        let at = 3 * 512 + i * 16;
        data[at..at + name.len()].copy_from_slice(name.as_bytes());
    }
    data
}

fn toy_superblock(rt: &Runtime<'_>, device: &Device<'_>) -> fsbridge::Result<[u8; 512]> {
    let mut sb = [0u8; 512];
    rt.disk_read(device.disk(), TOY_SUPERBLOCK_SECTOR, 0, &mut sb)?;
    if &sb[..6] != TOY_MAGIC {
        return Err(rt.error(ErrorCode::BadFs, format_args!("not a toyfs filesystem")));
    }
    Ok(sb)
}

pub fn toy_dir(
    rt: &Runtime<'_>,
    device: &Device<'_>,
    path: &str,
    hook: &mut DirHook<'_>,
) -> fsbridge::Result<()> {
    if path != "/" {
        return Err(rt.error(ErrorCode::FileNotFound, format_args!("{}", path)));
    }
    let sb = toy_superblock(rt, device)?;
    let info = DirhookInfo {
        mtime_set: true,
        mtime: 951_782_400,
        ..DirhookInfo::default()
    };
    for i in 0..u64::from(sb[0x80]) {
        let mut record = [0u8; 16];
        rt.disk_read(device.disk(), 3 + i / 32, (i % 32) * 16, &mut record)?;
        let len = record.iter().position(|&b| b == 0).unwrap_or(16);
        let name = std::str::from_utf8(&record[..len]).map_err(|_| ErrorCode::BadFs)?;
        if hook(name, &info) {
            break;
        }
    }
    Ok(())
}

pub fn toy_uuid(rt: &Runtime<'_>, device: &Device<'_>) -> fsbridge::Result<Option<String>> {
    let sb = toy_superblock(rt, device)?;
    let len = sb[8] as usize;
    let uuid = std::str::from_utf8(&sb[0x10..0x10 + len]).map_err(|_| ErrorCode::BadFs)?;
    Ok(Some(uuid.to_string()))
}

pub static TOY_DRIVER: FsDriver = FsDriver {
    name: "toyfs",
    dir: toy_dir,
    uuid: Some(toy_uuid),
    module: StaticModule::new("toyfs"),
};
