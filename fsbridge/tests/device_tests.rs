//! Device shadow lifecycle tests

mod common;

use common::*;
use fsbridge::device;
use fsbridge::VolumeContext;

#[test]
fn test_open_allocates_device_and_disk() {
    let pool = TestPool::new();
    let disk_io = memory_disk(vec![0u8; 4096]);

    let device = device::open(&pool, Some(VolumeContext::new(&disk_io))).unwrap();
    assert_eq!(pool.live.get(), 2);
    assert!(device.disk().context().is_some());

    device::close(device);
    assert_eq!(pool.live.get(), 0);
}

#[test]
fn test_open_close_is_allocation_neutral() {
    let pool = TestPool::new();
    let disk_io = memory_disk(vec![0u8; 4096]);
    let baseline = pool.used_bytes();

    for _ in 0..100 {
        let device = device::open(&pool, Some(VolumeContext::new(&disk_io))).unwrap();
        device::close(device);
    }
    assert_eq!(pool.used_bytes(), baseline);

    let device = device::open(&pool, None).unwrap();
    assert!(device.disk().context().is_none());
    device::close(device);
    assert_eq!(pool.used_bytes(), baseline);
    assert_eq!(pool.live.get(), 0);
}

#[test]
fn test_open_fails_on_first_allocation() {
    let pool = TestPool::new();
    pool.fail_after.set(Some(0));

    assert!(device::open(&pool, None).is_none());
    assert_eq!(pool.live.get(), 0);
    assert_eq!(pool.allocations.get(), 0);
}

#[test]
fn test_open_releases_device_when_disk_fails() {
    let pool = TestPool::new();
    let disk_io = memory_disk(vec![0u8; 4096]);
    let baseline = pool.used_bytes();
    pool.fail_after.set(Some(1));

    assert!(device::open(&pool, Some(VolumeContext::new(&disk_io))).is_none());
    assert_eq!(pool.allocations.get(), 1);
    assert_eq!(pool.live.get(), 0);
    assert_eq!(pool.used_bytes(), baseline);
}

#[test]
fn test_disk_keeps_volume_context() {
    let pool = TestPool::new();
    let disk_io = memory_disk(vec![0x5a; 4096]);

    let device = device::open(&pool, Some(VolumeContext::new(&disk_io))).unwrap();
    let mut buf = [0u8; 4];
    device.disk().read(1, 0, &mut buf).unwrap();
    assert_eq!(buf, [0x5a; 4]);
}
