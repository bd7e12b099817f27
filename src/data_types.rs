//! Data types for the MPQ421x driver.
//! Every enumerated register field is a Rust enum so only datasheet values reach the bus.

use crate::registers::{
    CONTROL1_SR_SHIFT, CONTROL2_FSW_SHIFT, DEFAULT_I2C_ADDRESS, I2C_ADDRESS_0X62, I2C_ADDRESS_0X64,
    I2C_ADDRESS_0X66, InterruptBits, REF_CODE_MAX, reference_code_for_vout, vout_mv_for_reference_code,
};

/// Chip variant. Selects the ILIM table and whether the CC interrupt exists.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Variant {
    Mpq4210,
    Mpq4214,
}

/// I2C slave addresses selectable through the ADDR pin.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum I2cAddress {
    Addr0x60,
    /// MPQ4214 only.
    Addr0x62,
    /// MPQ4214 only.
    Addr0x64,
    Addr0x66,
}

impl I2cAddress {
    pub fn value(self) -> u8 {
        match self {
            I2cAddress::Addr0x60 => DEFAULT_I2C_ADDRESS,
            I2cAddress::Addr0x62 => I2C_ADDRESS_0X62,
            I2cAddress::Addr0x64 => I2C_ADDRESS_0X64,
            I2cAddress::Addr0x66 => I2C_ADDRESS_0X66,
        }
    }

    /// Whether the given variant can be strapped to this address.
    pub fn available_on(self, variant: Variant) -> bool {
        match self {
            I2cAddress::Addr0x60 | I2cAddress::Addr0x66 => true,
            I2cAddress::Addr0x62 | I2cAddress::Addr0x64 => variant == Variant::Mpq4214,
        }
    }
}

/// Reference slew rate (CONTROL1 SR[1:0]).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SlewRate {
    #[default]
    Sr38MvPerMs,
    Sr50MvPerMs,
    Sr75MvPerMs,
    Sr150MvPerMs,
}

impl SlewRate {
    pub fn field(self) -> u8 {
        let code = match self {
            SlewRate::Sr38MvPerMs => 0b00,
            SlewRate::Sr50MvPerMs => 0b01,
            SlewRate::Sr75MvPerMs => 0b10,
            SlewRate::Sr150MvPerMs => 0b11,
        };
        code << CONTROL1_SR_SHIFT
    }

    pub fn from_field(control1: u8) -> Self {
        match (control1 >> CONTROL1_SR_SHIFT) & 0b11 {
            0b00 => SlewRate::Sr38MvPerMs,
            0b01 => SlewRate::Sr50MvPerMs,
            0b10 => SlewRate::Sr75MvPerMs,
            _ => SlewRate::Sr150MvPerMs,
        }
    }

    pub fn mv_per_ms(self) -> u32 {
        match self {
            SlewRate::Sr38MvPerMs => 38,
            SlewRate::Sr50MvPerMs => 50,
            SlewRate::Sr75MvPerMs => 75,
            SlewRate::Sr150MvPerMs => 150,
        }
    }

    /// Time for the reference to ramp across `delta_mv`, rounded up.
    pub fn ramp_time_ms(self, delta_mv: u32) -> u32 {
        delta_mv.div_ceil(self.mv_per_ms())
    }
}

/// Switching frequency (CONTROL2 FSW[1:0]).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SwitchingFrequency {
    #[default]
    Khz200,
    Khz300,
    Khz400,
    Khz600,
}

impl SwitchingFrequency {
    pub fn field(self) -> u8 {
        let code = match self {
            SwitchingFrequency::Khz200 => 0b00,
            SwitchingFrequency::Khz300 => 0b01,
            SwitchingFrequency::Khz400 => 0b10,
            SwitchingFrequency::Khz600 => 0b11,
        };
        code << CONTROL2_FSW_SHIFT
    }

    pub fn from_field(control2: u8) -> Self {
        match (control2 >> CONTROL2_FSW_SHIFT) & 0b11 {
            0b00 => SwitchingFrequency::Khz200,
            0b01 => SwitchingFrequency::Khz300,
            0b10 => SwitchingFrequency::Khz400,
            _ => SwitchingFrequency::Khz600,
        }
    }

    pub fn khz(self) -> u16 {
        match self {
            SwitchingFrequency::Khz200 => 200,
            SwitchingFrequency::Khz300 => 300,
            SwitchingFrequency::Khz400 => 400,
            SwitchingFrequency::Khz600 => 600,
        }
    }
}

/// Response to an over-current or over-voltage event.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ProtectionMode {
    /// Report only.
    #[default]
    None,
    /// Stop switching and retry automatically.
    Hiccup,
    /// Stop switching until ENPWR is toggled or power is cycled.
    Latch,
}

impl ProtectionMode {
    /// Unshifted 2-bit code.
    pub fn code(self) -> u8 {
        match self {
            ProtectionMode::None => 0b00,
            ProtectionMode::Hiccup => 0b01,
            ProtectionMode::Latch => 0b10,
        }
    }

    /// Decode a 2-bit code; the reserved value 0b11 yields `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code & 0b11 {
            0b00 => Some(ProtectionMode::None),
            0b01 => Some(ProtectionMode::Hiccup),
            0b10 => Some(ProtectionMode::Latch),
            _ => None,
        }
    }
}

/// MPQ4210 average current limit thresholds (voltage across IAVGP/IAVGN).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mpq4210Ilim {
    Mv27p9,
    Mv33p3,
    Mv39p3,
    Mv45p1,
    Mv51p2,
    Mv56p8,
    Mv62p8,
    Mv68p7,
}

impl Mpq4210Ilim {
    pub const ALL: [Mpq4210Ilim; 8] = [
        Mpq4210Ilim::Mv27p9,
        Mpq4210Ilim::Mv33p3,
        Mpq4210Ilim::Mv39p3,
        Mpq4210Ilim::Mv45p1,
        Mpq4210Ilim::Mv51p2,
        Mpq4210Ilim::Mv56p8,
        Mpq4210Ilim::Mv62p8,
        Mpq4210Ilim::Mv68p7,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Threshold in units of 0.1 mV.
    pub fn tenths_mv(self) -> u16 {
        match self {
            Mpq4210Ilim::Mv27p9 => 279,
            Mpq4210Ilim::Mv33p3 => 333,
            Mpq4210Ilim::Mv39p3 => 393,
            Mpq4210Ilim::Mv45p1 => 451,
            Mpq4210Ilim::Mv51p2 => 512,
            Mpq4210Ilim::Mv56p8 => 568,
            Mpq4210Ilim::Mv62p8 => 628,
            Mpq4210Ilim::Mv68p7 => 687,
        }
    }
}

/// MPQ4214 average current limit thresholds.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mpq4214Ilim {
    Mv26,
    Mv32,
    Mv38,
    Mv45,
    Mv50,
    Mv56,
    Mv62,
    Mv68,
}

impl Mpq4214Ilim {
    pub const ALL: [Mpq4214Ilim; 8] = [
        Mpq4214Ilim::Mv26,
        Mpq4214Ilim::Mv32,
        Mpq4214Ilim::Mv38,
        Mpq4214Ilim::Mv45,
        Mpq4214Ilim::Mv50,
        Mpq4214Ilim::Mv56,
        Mpq4214Ilim::Mv62,
        Mpq4214Ilim::Mv68,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Threshold in units of 0.1 mV.
    pub fn tenths_mv(self) -> u16 {
        match self {
            Mpq4214Ilim::Mv26 => 260,
            Mpq4214Ilim::Mv32 => 320,
            Mpq4214Ilim::Mv38 => 380,
            Mpq4214Ilim::Mv45 => 450,
            Mpq4214Ilim::Mv50 => 500,
            Mpq4214Ilim::Mv56 => 560,
            Mpq4214Ilim::Mv62 => 620,
            Mpq4214Ilim::Mv68 => 680,
        }
    }
}

/// Current limit threshold tagged with the variant it belongs to.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CurrentLimit {
    Mpq4210(Mpq4210Ilim),
    Mpq4214(Mpq4214Ilim),
}

impl CurrentLimit {
    pub fn variant(self) -> Variant {
        match self {
            CurrentLimit::Mpq4210(_) => Variant::Mpq4210,
            CurrentLimit::Mpq4214(_) => Variant::Mpq4214,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            CurrentLimit::Mpq4210(t) => t.code(),
            CurrentLimit::Mpq4214(t) => t.code(),
        }
    }

    /// Average current limit in mA for a sense resistor in milliohms.
    pub fn limit_ma(self, rsense_mohm: u32) -> u32 {
        if rsense_mohm == 0 {
            return 0;
        }
        let tenths = match self {
            CurrentLimit::Mpq4210(t) => t.tenths_mv(),
            CurrentLimit::Mpq4214(t) => t.tenths_mv(),
        } as u32;
        // mV / mΩ = A, so (tenths / 10) * 1000 / rsense = tenths * 100 / rsense mA.
        tenths * 100 / rsense_mohm
    }
}

impl From<Mpq4210Ilim> for CurrentLimit {
    fn from(value: Mpq4210Ilim) -> Self {
        CurrentLimit::Mpq4210(value)
    }
}

impl From<Mpq4214Ilim> for CurrentLimit {
    fn from(value: Mpq4214Ilim) -> Self {
        CurrentLimit::Mpq4214(value)
    }
}

/// Interrupt sources in INT_STATUS / INT_MASK.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Interrupt {
    OverTemperature,
    /// MPQ4214 only.
    ConstantCurrent,
    OverVoltage,
    OverCurrent,
    PowerGood,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::OverTemperature,
        Interrupt::ConstantCurrent,
        Interrupt::OverVoltage,
        Interrupt::OverCurrent,
        Interrupt::PowerGood,
    ];

    pub fn bits(self) -> InterruptBits {
        match self {
            Interrupt::OverTemperature => InterruptBits::OTP,
            Interrupt::ConstantCurrent => InterruptBits::CC,
            Interrupt::OverVoltage => InterruptBits::OVP,
            Interrupt::OverCurrent => InterruptBits::OCP,
            Interrupt::PowerGood => InterruptBits::PNG,
        }
    }

    pub fn supported_by(self, variant: Variant) -> bool {
        !matches!((self, variant), (Interrupt::ConstantCurrent, Variant::Mpq4210))
    }
}

/// Fault flags decoded from INT_STATUS.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InterruptFlags {
    pub over_temperature: bool,
    pub constant_current: bool,
    pub over_voltage: bool,
    pub over_current: bool,
    pub power_good: bool,
}

impl From<InterruptBits> for InterruptFlags {
    fn from(bits: InterruptBits) -> Self {
        Self {
            over_temperature: bits.contains(InterruptBits::OTP),
            constant_current: bits.contains(InterruptBits::CC),
            over_voltage: bits.contains(InterruptBits::OVP),
            over_current: bits.contains(InterruptBits::OCP),
            power_good: bits.contains(InterruptBits::PNG),
        }
    }
}

impl InterruptFlags {
    pub fn any(&self) -> bool {
        self.over_temperature || self.constant_current || self.over_voltage || self.over_current || self.power_good
    }
}

/// Resistive feedback divider from VOUT to FB (`r_top_ohm`) and FB to ground (`r_bottom_ohm`).
/// Only built through [`FeedbackDivider::new`], so the bottom resistor is never zero.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeedbackDivider {
    r_top_ohm: u32,
    r_bottom_ohm: u32,
}

impl FeedbackDivider {
    /// Returns `None` when the bottom resistor is zero (FB tied to ground).
    pub fn new(r_top_ohm: u32, r_bottom_ohm: u32) -> Option<Self> {
        if r_bottom_ohm == 0 {
            return None;
        }
        Some(Self { r_top_ohm, r_bottom_ohm })
    }

    pub fn r_top_ohm(&self) -> u32 {
        self.r_top_ohm
    }

    pub fn r_bottom_ohm(&self) -> u32 {
        self.r_bottom_ohm
    }

    /// Reference code for `vout_mv`, clamped to the 11-bit DAC range.
    pub fn reference_for(&self, vout_mv: u32) -> ReferenceTarget {
        let raw = reference_code_for_vout(vout_mv, self.r_top_ohm, self.r_bottom_ohm);
        if raw > REF_CODE_MAX as u32 {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "VOUT {=u32} mV unreachable with divider, clamping to {=u32} mV",
                vout_mv,
                self.max_vout_mv()
            );
            ReferenceTarget {
                code: REF_CODE_MAX,
                clamped: true,
            }
        } else {
            ReferenceTarget {
                code: raw as u16,
                clamped: false,
            }
        }
    }

    /// Highest output voltage reachable with this divider.
    pub fn max_vout_mv(&self) -> u32 {
        self.vout_mv_for(REF_CODE_MAX)
    }

    pub fn vout_mv_for(&self, code: u16) -> u32 {
        vout_mv_for_reference_code(code, self.r_top_ohm, self.r_bottom_ohm)
    }
}

/// Result of converting an output voltage to a reference code.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReferenceTarget {
    pub code: u16,
    /// The requested voltage exceeded what the divider allows and `code` is the DAC maximum.
    pub clamped: bool,
}

/// Full device configuration applied by [`crate::Mpq421x::configure`].
/// `Default` matches the power-on register state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    pub slew_rate: SlewRate,
    pub output_discharge: bool,
    pub frequency_dither: bool,
    pub power_good_latch: bool,
    pub switching_frequency: SwitchingFrequency,
    pub buck_boost_frequency_high: bool,
    pub ocp_mode: ProtectionMode,
    pub ovp_mode: ProtectionMode,
    pub current_limit: Option<CurrentLimit>,
    pub interrupts: InterruptBits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slew_rate: SlewRate::default(),
            output_discharge: false,
            frequency_dither: false,
            power_good_latch: false,
            switching_frequency: SwitchingFrequency::default(),
            buck_boost_frequency_high: false,
            ocp_mode: ProtectionMode::default(),
            ovp_mode: ProtectionMode::default(),
            current_limit: None,
            interrupts: InterruptBits::empty(),
        }
    }
}
