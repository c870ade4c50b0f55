//! Raw UEFI tables and protocols
//!
//! Only the members the bridge calls are typed; everything else is kept as a
//! `usize` placeholder so the offsets line up with the UEFI 2.x layouts.

#![allow(missing_docs)]

use super::{
    ConsoleIn, ConsoleOut, DiskIo, Firmware, ImageControl, InputKey, PoolServices, Status,
    VariableStore,
};
use crate::time::CalendarTime;
use core::ptr::NonNull;
use uguid::Guid;

/// EfiBootServicesData pool type
pub const EFI_BOOT_SERVICES_DATA: usize = 4;

/// Disk I/O protocol GUID: CE345171-BA0B-11D2-8E4F-00A0C969723B
pub const EFI_DISK_IO_PROTOCOL_GUID: Guid = uguid::guid!("ce345171-ba0b-11d2-8e4f-00a0c969723b");

#[repr(C)]
pub struct SimpleTextInputProtocol {
    pub reset: extern "efiapi" fn(*mut SimpleTextInputProtocol, bool) -> usize,
    pub read_key_stroke: extern "efiapi" fn(*mut SimpleTextInputProtocol, *mut InputKey) -> usize,
    pub wait_for_key: *mut (),
}

#[repr(C)]
pub struct SimpleTextOutputProtocol {
    pub reset: extern "efiapi" fn(*mut SimpleTextOutputProtocol, bool) -> usize,
    pub output_string: extern "efiapi" fn(*mut SimpleTextOutputProtocol, *const u16) -> usize,
    _test_string: usize,
    _query_mode: usize,
    _set_mode: usize,
    _set_attribute: usize,
    _clear_screen: usize,
    _set_cursor_position: usize,
    _enable_cursor: usize,
    _mode: usize,
}

#[repr(C)]
pub struct DiskIoProtocol {
    pub revision: u64,
    pub read_disk: extern "efiapi" fn(
        *mut DiskIoProtocol,
        u32,     // MediaId
        u64,     // Offset
        usize,   // BufferSize
        *mut u8, // Buffer
    ) -> usize,
    pub write_disk:
        extern "efiapi" fn(*mut DiskIoProtocol, u32, u64, usize, *const u8) -> usize,
}

#[repr(C)]
pub struct SystemTable {
    _header: [u8; 24],
    _firmware_vendor: *const u16,
    _firmware_revision: u32,
    _console_in_handle: *const (),
    pub con_in: *mut SimpleTextInputProtocol,
    _console_out_handle: *const (),
    pub con_out: *mut SimpleTextOutputProtocol,
    _stderr_handle: *const (),
    _stderr: *const (),
    pub runtime_services: *const RuntimeServices,
    pub boot_services: *const BootServices,
    _number_of_table_entries: usize,
    _configuration_table: *const (),
}

#[repr(C)]
pub struct RuntimeServices {
    _header: [u8; 24],
    // Time Services
    _get_time: usize,
    _set_time: usize,
    _get_wakeup_time: usize,
    _set_wakeup_time: usize,
    // Virtual Memory Services
    _set_virtual_address_map: usize,
    _convert_pointer: usize,
    // Variable Services
    pub get_variable: extern "efiapi" fn(
        variable_name: *const u16,
        vendor_guid: *const Guid,
        attributes: *mut u32,
        data_size: *mut usize,
        data: *mut u8,
    ) -> usize,
    _get_next_variable_name: usize,
    _set_variable: usize,
    // Miscellaneous Services
    _get_next_high_monotonic_count: usize,
    _reset_system: usize,
}

#[repr(C)]
pub struct BootServices {
    _header: [u8; 24],
    // Task Priority Services
    _raise_tpl: usize,
    _restore_tpl: usize,
    // Memory Services
    _allocate_pages: usize,
    _free_pages: usize,
    _get_memory_map: usize,
    pub allocate_pool:
        extern "efiapi" fn(pool_type: usize, size: usize, buffer: *mut *mut u8) -> usize,
    pub free_pool: extern "efiapi" fn(buffer: *mut u8) -> usize,
    // Event & Timer Services
    _create_event: usize,
    _set_timer: usize,
    _wait_for_event: usize,
    _signal_event: usize,
    _close_event: usize,
    _check_event: usize,
    // Protocol Handler Services
    _install_protocol_interface: usize,
    _reinstall_protocol_interface: usize,
    _uninstall_protocol_interface: usize,
    _handle_protocol: usize,
    _reserved: usize,
    _register_protocol_notify: usize,
    _locate_handle: usize,
    _locate_device_path: usize,
    _install_configuration_table: usize,
    // Image Services
    _load_image: usize,
    _start_image: usize,
    pub exit: extern "efiapi" fn(
        image_handle: *mut (),
        exit_status: usize,
        exit_data_size: usize,
        exit_data: *const u16,
    ) -> usize,
    _unload_image: usize,
    _exit_boot_services: usize,
}

/// UEFI `EFI_TIME`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EfiTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub pad1: u8,
    pub nanosecond: u32,
    pub time_zone: i16,
    pub daylight: u8,
    pub pad2: u8,
}

/// Time is local, offset unknown
pub const EFI_UNSPECIFIED_TIMEZONE: i16 = 0x07FF;

impl From<CalendarTime> for EfiTime {
    fn from(t: CalendarTime) -> Self {
        EfiTime {
            year: t.year,
            month: t.month,
            day: t.day,
            hour: t.hour,
            minute: t.minute,
            second: t.second,
            time_zone: EFI_UNSPECIFIED_TIMEZONE,
            ..EfiTime::default()
        }
    }
}

/// Boot services of the running image, exposed through the firmware traits
pub struct EfiFirmware {
    image_handle: *mut (),
    system_table: *const SystemTable,
}

impl EfiFirmware {
    /// Wrap the arguments `efi_main` received
    ///
    /// # Safety
    /// Both pointers must be the ones handed to the image entry point and boot
    /// services must stay available for the lifetime of this value.
    pub unsafe fn new(image_handle: *mut (), system_table: *const ()) -> Self {
        Self {
            image_handle,
            system_table: system_table as *const SystemTable,
        }
    }

    fn st(&self) -> &SystemTable {
        // SAFETY: valid for our lifetime (constructor contract)
        unsafe { &*self.system_table }
    }

    fn bs(&self) -> &BootServices {
        // SAFETY: boot services live until ExitBootServices
        unsafe { &*self.st().boot_services }
    }

    /// All services bundled for a [`crate::Runtime`]
    pub fn services(&self) -> Firmware<'_> {
        Firmware {
            pool: self,
            con_in: self,
            con_out: self,
            variables: self,
            image: self,
        }
    }
}

impl PoolServices for EfiFirmware {
    fn allocate_pool(&self, size: usize) -> Result<NonNull<u8>, Status> {
        let mut buffer: *mut u8 = core::ptr::null_mut();
        Status((self.bs().allocate_pool)(EFI_BOOT_SERVICES_DATA, size, &mut buffer)).to_result()?;
        NonNull::new(buffer).ok_or(Status::OUT_OF_RESOURCES)
    }

    unsafe fn free_pool(&self, buffer: NonNull<u8>) -> Result<(), Status> {
        Status((self.bs().free_pool)(buffer.as_ptr())).to_result()
    }
}

impl ConsoleIn for EfiFirmware {
    fn read_key_stroke(&self) -> Result<InputKey, Status> {
        let con_in = self.st().con_in;
        let mut key = InputKey::default();
        // SAFETY: con_in is installed by the firmware for the whole boot phase
        let status = unsafe { ((*con_in).read_key_stroke)(con_in, &mut key) };
        Status(status).to_result().map(|_| key)
    }
}

impl ConsoleOut for EfiFirmware {
    fn output_string(&self, text: &[u16]) -> Result<(), Status> {
        if text.last() != Some(&0) {
            return Err(Status::INVALID_PARAMETER);
        }
        let con_out = self.st().con_out;
        // SAFETY: text is NUL-terminated, con_out installed by the firmware
        let status = unsafe { ((*con_out).output_string)(con_out, text.as_ptr()) };
        Status(status).to_result()
    }
}

impl VariableStore for EfiFirmware {
    fn get_variable(&self, name: &[u16], vendor: &Guid, data: &mut [u8]) -> Result<usize, Status> {
        if name.last() != Some(&0) {
            return Err(Status::INVALID_PARAMETER);
        }
        // UEFI wants the size in bytes and updates it in place
        let mut size = data.len();
        // SAFETY: runtime services outlive boot services
        let rt = unsafe { &*self.st().runtime_services };
        let status = (rt.get_variable)(
            name.as_ptr(),
            vendor,
            core::ptr::null_mut(),
            &mut size,
            data.as_mut_ptr(),
        );
        Status(status).to_result().map(|_| size)
    }
}

impl ImageControl for EfiFirmware {
    fn exit(&self, status: Status) {
        let _ = (self.bs().exit)(self.image_handle, status.0, 0, core::ptr::null());
    }
}

/// Disk I/O protocol instance of one volume
pub struct EfiDiskIo {
    protocol: *mut DiskIoProtocol,
}

impl EfiDiskIo {
    /// Wrap an opened Disk I/O protocol
    ///
    /// # Safety
    /// The protocol pointer must stay valid for the lifetime of this wrapper.
    pub unsafe fn new(protocol: *mut DiskIoProtocol) -> Self {
        Self { protocol }
    }

    /// Underlying protocol pointer
    pub fn protocol(&self) -> *mut DiskIoProtocol {
        self.protocol
    }
}

impl DiskIo for EfiDiskIo {
    fn read_disk(&self, media_id: u32, offset: u64, buffer: &mut [u8]) -> Result<(), Status> {
        // SAFETY: protocol pointer is valid (guaranteed by constructor)
        let status = unsafe {
            ((*self.protocol).read_disk)(
                self.protocol,
                media_id,
                offset,
                buffer.len(),
                buffer.as_mut_ptr(),
            )
        };
        Status(status).to_result()
    }
}
