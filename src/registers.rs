//! Register map and constants for MPQ4210/MPQ4214.
//! Field positions follow the datasheet register tables; both parts share the same map.

/// Default I2C address (ADDR pin preset shared by both parts).
pub const DEFAULT_I2C_ADDRESS: u8 = 0x60;
/// MPQ4214 ADDR preset 2.
pub const I2C_ADDRESS_0X62: u8 = 0x62;
/// MPQ4214 ADDR preset 3.
pub const I2C_ADDRESS_0X64: u8 = 0x64;
/// Alternate address available on both parts.
pub const I2C_ADDRESS_0X66: u8 = 0x66;

/// Register addresses.
pub mod addr {
    /// Reference DAC bits 2:0 (1 mV LSB).
    pub const REF_LSB: u8 = 0x00;
    /// Reference DAC bits 10:3.
    pub const REF_MSB: u8 = 0x01;
    /// Slew rate, discharge, dither, PNG latch, GO_BIT, ENPWR.
    pub const CONTROL1: u8 = 0x02;
    /// Switching frequency, buck-boost frequency, OCP and OVP modes.
    pub const CONTROL2: u8 = 0x03;
    /// Average current limit threshold.
    pub const ILIM: u8 = 0x04;
    /// Fault status (write-1-to-clear).
    pub const INT_STATUS: u8 = 0x05;
    /// Interrupt enables.
    pub const INT_MASK: u8 = 0x06;
}

/// Number of registers in the map.
pub const REGISTER_COUNT: usize = 7;

/// Reference DAC width and limits. One code is one millivolt of reference.
pub const REF_BITS: u32 = 11;
pub const REF_CODE_MAX: u16 = (1 << REF_BITS) - 1;
pub const REF_LSB_MASK: u16 = 0x007;
pub const REF_MSB_MASK: u16 = 0x7F8;

/// CONTROL1 slew-rate field (bits 7:6).
pub const CONTROL1_SR_MASK: u8 = 0b1100_0000;
pub const CONTROL1_SR_SHIFT: u8 = 6;

/// CONTROL2 fields.
pub const CONTROL2_FSW_MASK: u8 = 0b1100_0000;
pub const CONTROL2_FSW_SHIFT: u8 = 6;
pub const CONTROL2_OCP_MASK: u8 = 0b0000_1100;
pub const CONTROL2_OCP_SHIFT: u8 = 2;
pub const CONTROL2_OVP_MASK: u8 = 0b0000_0011;
pub const CONTROL2_OVP_SHIFT: u8 = 0;

/// ILIM threshold field (bits 2:0). The register is written whole.
pub const ILIM_MASK: u8 = 0b0000_0111;

/// Value written to INT_STATUS to clear every latched fault.
pub const INT_STATUS_CLEAR_ALL: u8 = 0xFF;

/// Settle time applied after committing a new reference.
pub const DEFAULT_SETTLE_MS: u32 = 200;
/// Shortest settle time the reference sequence accepts.
pub const MIN_SETTLE_MS: u32 = DEFAULT_SETTLE_MS;

bitflags::bitflags! {
    /// CONTROL1 register bits (0x02).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Control1Bits: u8 {
        /// Bits 7-6: reference slew rate.
        const SR1       = 1 << 7;
        const SR0       = 1 << 6;
        /// Bit 5: output discharge path to ground.
        const DISCHG    = 1 << 5;
        /// Bit 4: frequency dither (spread spectrum).
        const DITHER    = 1 << 4;
        /// Bit 3: latch PNG low after a fault.
        const PNG_LATCH = 1 << 3;
        // Bit 2 reserved.
        /// Bit 1: commit REF_LSB/REF_MSB to the DAC. Self-clearing.
        const GO_BIT    = 1 << 1;
        /// Bit 0: power switching enable.
        const ENPWR     = 1 << 0;
    }

    /// CONTROL2 register bits (0x03).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Control2Bits: u8 {
        const FSW1  = 1 << 7;
        const FSW0  = 1 << 6;
        // Bit 5 reserved.
        /// Bit 4: raise switching frequency in the buck-boost region.
        const BB_FSW = 1 << 4;
        const OCP1  = 1 << 3;
        const OCP0  = 1 << 2;
        const OVP1  = 1 << 1;
        const OVP0  = 1 << 0;
    }

    /// INT_STATUS (0x05) and INT_MASK (0x06) share this layout.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct InterruptBits: u8 {
        /// Over-temperature.
        const OTP = 1 << 4;
        /// Constant-current regulation (MPQ4214 only).
        const CC  = 1 << 3;
        /// Over-voltage.
        const OVP = 1 << 2;
        /// Over-current.
        const OCP = 1 << 1;
        /// Power-good.
        const PNG = 1 << 0;
    }
}

impl InterruptBits {
    /// Sources present on the MPQ4210.
    pub const MPQ4210_ALL: Self = Self::OTP.union(Self::OVP).union(Self::OCP).union(Self::PNG);
}

/// Split an 11-bit reference code into (REF_LSB, REF_MSB) register values.
pub fn split_reference_code(code: u16) -> (u8, u8) {
    let lsb = (code & REF_LSB_MASK) as u8;
    let msb = ((code & REF_MSB_MASK) >> 3) as u8;
    (lsb, msb)
}

/// Rebuild the reference code from REF_LSB/REF_MSB register values.
pub fn join_reference_code(lsb: u8, msb: u8) -> u16 {
    ((msb as u16) << 3) | (lsb as u16 & REF_LSB_MASK)
}

/// Reference code for a target output voltage through a feedback divider
/// (`r_top` from VOUT to FB, `r_bottom` from FB to ground), rounded to the
/// nearest code. Returns the unclamped code; callers clamp to [`REF_CODE_MAX`].
pub fn reference_code_for_vout(vout_mv: u32, r_top_ohm: u32, r_bottom_ohm: u32) -> u32 {
    let total = r_top_ohm as u128 + r_bottom_ohm as u128;
    if total == 0 {
        return 0;
    }
    // u32 * u32 doubled overflows u64, so round in u128 and saturate.
    let num = vout_mv as u128 * r_bottom_ohm as u128;
    let code = (2 * num + total) / (2 * total);
    code.min(u32::MAX as u128) as u32
}

/// Output voltage produced by a reference code through a feedback divider.
pub fn vout_mv_for_reference_code(code: u16, r_top_ohm: u32, r_bottom_ohm: u32) -> u32 {
    if r_bottom_ohm == 0 {
        return 0;
    }
    let total = r_top_ohm as u64 + r_bottom_ohm as u64;
    let mv = (code as u64 * total) / r_bottom_ohm as u64;
    mv.min(u32::MAX as u64) as u32
}
