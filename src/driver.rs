//! MPQ4210/MPQ4214 driver.
//! Blocking I2C helpers; the `async` feature mirrors the API with `_async` methods.

use crate::data_types::{
    Config, CurrentLimit, FeedbackDivider, I2cAddress, Interrupt, InterruptFlags, ProtectionMode, ReferenceTarget,
    SlewRate, SwitchingFrequency, Variant,
};
use crate::error::Error;
use crate::registers::{
    CONTROL1_SR_MASK, CONTROL2_FSW_MASK, CONTROL2_OCP_MASK, CONTROL2_OCP_SHIFT, CONTROL2_OVP_MASK, CONTROL2_OVP_SHIFT,
    Control1Bits, Control2Bits, DEFAULT_I2C_ADDRESS, DEFAULT_SETTLE_MS, ILIM_MASK, INT_STATUS_CLEAR_ALL,
    InterruptBits, MIN_SETTLE_MS, REF_CODE_MAX, addr, join_reference_code, split_reference_code,
};

/// CONTROL1 bits owned by [`Config`]. ENPWR and GO_BIT are left to the sequencing methods.
const CONFIG_CONTROL1_MASK: u8 = CONTROL1_SR_MASK
    | Control1Bits::DISCHG.bits()
    | Control1Bits::DITHER.bits()
    | Control1Bits::PNG_LATCH.bits();
const CONFIG_CONTROL2_MASK: u8 =
    CONTROL2_FSW_MASK | Control2Bits::BB_FSW.bits() | CONTROL2_OCP_MASK | CONTROL2_OVP_MASK;

/// MPQ4210/MPQ4214 driver. Holds no register state; every accessor reads the chip first.
pub struct Mpq421x<I2C> {
    i2c: I2C,
    address: u8,
    variant: Variant,
    settle_ms: u32,
}

impl<I2C> Mpq421x<I2C> {
    /// Create a driver at the default address (0x60).
    pub fn new(i2c: I2C, variant: Variant) -> Self {
        Self::with_address(i2c, variant, DEFAULT_I2C_ADDRESS)
    }

    /// Create a driver at a custom 7-bit address.
    pub fn with_address(i2c: I2C, variant: Variant, address: u8) -> Self {
        Self {
            i2c,
            address,
            variant,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Delay applied by [`Mpq421x::set_reference`] between GO_BIT and re-enabling switching.
    pub fn settle_time_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Set the settle delay, floored at [`MIN_SETTLE_MS`]. The floor covers a full-scale
    /// reference ramp at the slowest slew rate with margin.
    pub fn set_settle_time_ms(&mut self, ms: u32) {
        self.settle_ms = ms.max(MIN_SETTLE_MS);
    }

    /// Release the bus.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

// Needs only the bus error type, so it serves the blocking and async APIs alike.
impl<I2C> Mpq421x<I2C>
where
    I2C: embedded_hal::i2c::ErrorType,
{
    /// Create a driver at an ADDR-pin preset, rejecting presets the variant cannot be strapped to.
    pub fn with_preset_address(i2c: I2C, variant: Variant, address: I2cAddress) -> Result<Self, Error<I2C::Error>> {
        if !address.available_on(variant) {
            #[cfg(feature = "defmt")]
            defmt::warn!("address {=u8:#x} is not available on {}", address.value(), variant);
            return Err(Error::InvalidConfig);
        }
        Ok(Self::with_address(i2c, variant, address.value()))
    }

    fn check_reference_code(code: u16) -> Result<(u8, u8), Error<I2C::Error>> {
        if code > REF_CODE_MAX {
            #[cfg(feature = "defmt")]
            defmt::warn!("reference code {=u16} exceeds 11 bits", code);
            return Err(Error::OutOfRange);
        }
        Ok(split_reference_code(code))
    }

    fn check_current_limit(&self, limit: CurrentLimit) -> Result<(), Error<I2C::Error>> {
        if limit.variant() != self.variant {
            #[cfg(feature = "defmt")]
            defmt::warn!("current limit {} does not apply to {}", limit, self.variant);
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    fn check_interrupts(&self, bits: InterruptBits) -> Result<(), Error<I2C::Error>> {
        if self.variant == Variant::Mpq4210 && bits.intersects(InterruptBits::CC) {
            #[cfg(feature = "defmt")]
            defmt::warn!("CC interrupt is not available on MPQ4210");
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// INT_MASK bits that exist on this variant. Bit 3 is CC on the MPQ4214 and reserved on the MPQ4210.
    fn interrupt_field_mask(&self) -> u8 {
        match self.variant {
            Variant::Mpq4210 => InterruptBits::MPQ4210_ALL.bits(),
            Variant::Mpq4214 => InterruptBits::all().bits(),
        }
    }

    fn config_fields(&self, config: &Config) -> Result<(u8, u8), Error<I2C::Error>> {
        if let Some(limit) = config.current_limit {
            self.check_current_limit(limit)?;
        }
        self.check_interrupts(config.interrupts)?;

        let mut control1 = config.slew_rate.field();
        if config.output_discharge {
            control1 |= Control1Bits::DISCHG.bits();
        }
        if config.frequency_dither {
            control1 |= Control1Bits::DITHER.bits();
        }
        if config.power_good_latch {
            control1 |= Control1Bits::PNG_LATCH.bits();
        }

        let mut control2 = config.switching_frequency.field()
            | (config.ocp_mode.code() << CONTROL2_OCP_SHIFT)
            | (config.ovp_mode.code() << CONTROL2_OVP_SHIFT);
        if config.buck_boost_frequency_high {
            control2 |= Control2Bits::BB_FSW.bits();
        }
        Ok((control1, control2))
    }
}

impl<I2C> Mpq421x<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Write a single register.
    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(Error::I2c)
    }

    /// Read a single register.
    pub fn read_reg(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    /// Update masked bits in a register (read-modify-write).
    pub fn update_reg(&mut self, reg: u8, mask: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg(reg)?;
        let new = (cur & !mask) | (value & mask);
        self.write_reg(reg, new)
    }

    fn set_control1_flag(&mut self, flag: Control1Bits, on: bool) -> Result<(), Error<I2C::Error>> {
        let value = if on { flag.bits() } else { 0 };
        self.update_reg(addr::CONTROL1, flag.bits(), value)
    }

    /// Change the output reference without glitching VOUT.
    ///
    /// Switching is stopped if running, the new code is written and committed with GO_BIT,
    /// `delay` waits out the settle time, then switching is enabled. The ENPWR check tests the
    /// enable bit itself.
    pub fn set_reference<D>(&mut self, code: u16, delay: &mut D) -> Result<(), Error<I2C::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        let (lsb, msb) = Self::check_reference_code(code)?;

        let control1 = self.read_reg(addr::CONTROL1)?;
        if control1 & Control1Bits::ENPWR.bits() != 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!("MPQ421x@{=u8:#x}: stopping switching for reference update", self.address);
            self.write_reg(addr::CONTROL1, control1 & !Control1Bits::ENPWR.bits())?;
        }

        self.commit_reference(lsb, msb)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("MPQ421x@{=u8:#x}: settling {=u32} ms", self.address, self.settle_ms);
        delay.delay_ms(self.settle_ms);

        self.set_control1_flag(Control1Bits::ENPWR, true)
    }

    /// Write and commit a reference code without touching ENPWR.
    /// Use when switching is already off or controlled elsewhere.
    pub fn write_reference(&mut self, code: u16) -> Result<(), Error<I2C::Error>> {
        let (lsb, msb) = Self::check_reference_code(code)?;
        self.commit_reference(lsb, msb)
    }

    fn commit_reference(&mut self, lsb: u8, msb: u8) -> Result<(), Error<I2C::Error>> {
        self.write_reg(addr::REF_LSB, lsb)?;
        self.write_reg(addr::REF_MSB, msb)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("MPQ421x@{=u8:#x}: REF={=u16}, GO", self.address, join_reference_code(lsb, msb));
        self.set_go_bit()
    }

    /// Convert `vout_mv` through `divider` and run [`Mpq421x::set_reference`].
    /// A clamped conversion still programs the DAC maximum; check [`ReferenceTarget::clamped`].
    pub fn set_output_voltage_mv<D>(
        &mut self,
        vout_mv: u32,
        divider: &FeedbackDivider,
        delay: &mut D,
    ) -> Result<ReferenceTarget, Error<I2C::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        let target = divider.reference_for(vout_mv);
        self.set_reference(target.code, delay)?;
        Ok(target)
    }

    /// Read back the programmed reference code.
    pub fn reference_code(&mut self) -> Result<u16, Error<I2C::Error>> {
        let lsb = self.read_reg(addr::REF_LSB)?;
        let msb = self.read_reg(addr::REF_MSB)?;
        Ok(join_reference_code(lsb, msb))
    }

    pub fn enable_power_switching(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag(Control1Bits::ENPWR, true)
    }

    pub fn disable_power_switching(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag(Control1Bits::ENPWR, false)
    }

    pub fn is_power_switching_enabled(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.control1()?.contains(Control1Bits::ENPWR))
    }

    /// Commit REF_LSB/REF_MSB to the DAC.
    pub fn set_go_bit(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag(Control1Bits::GO_BIT, true)
    }

    pub fn enable_power_good_latch(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag(Control1Bits::PNG_LATCH, true)
    }

    pub fn disable_power_good_latch(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag(Control1Bits::PNG_LATCH, false)
    }

    /// Spread-spectrum switching.
    pub fn enable_frequency_dither(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag(Control1Bits::DITHER, true)
    }

    pub fn disable_frequency_dither(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag(Control1Bits::DITHER, false)
    }

    pub fn enable_output_discharge(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag(Control1Bits::DISCHG, true)
    }

    pub fn disable_output_discharge(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag(Control1Bits::DISCHG, false)
    }

    /// Reference slew rate. VOUT still follows the soft-start ramp.
    pub fn set_slew_rate(&mut self, slew: SlewRate) -> Result<(), Error<I2C::Error>> {
        self.update_reg(addr::CONTROL1, CONTROL1_SR_MASK, slew.field())
    }

    pub fn set_switching_frequency(&mut self, fsw: SwitchingFrequency) -> Result<(), Error<I2C::Error>> {
        self.update_reg(addr::CONTROL2, CONTROL2_FSW_MASK, fsw.field())
    }

    pub fn set_buck_boost_frequency_high(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_reg(addr::CONTROL2, Control2Bits::BB_FSW.bits(), Control2Bits::BB_FSW.bits())
    }

    pub fn set_buck_boost_frequency_low(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_reg(addr::CONTROL2, Control2Bits::BB_FSW.bits(), 0)
    }

    pub fn set_ocp_mode(&mut self, mode: ProtectionMode) -> Result<(), Error<I2C::Error>> {
        self.update_reg(addr::CONTROL2, CONTROL2_OCP_MASK, mode.code() << CONTROL2_OCP_SHIFT)
    }

    pub fn set_ovp_mode(&mut self, mode: ProtectionMode) -> Result<(), Error<I2C::Error>> {
        self.update_reg(addr::CONTROL2, CONTROL2_OVP_MASK, mode.code() << CONTROL2_OVP_SHIFT)
    }

    /// Program the average current limit. The ILIM register is written whole.
    pub fn set_current_limit(&mut self, limit: impl Into<CurrentLimit>) -> Result<(), Error<I2C::Error>> {
        let limit = limit.into();
        self.check_current_limit(limit)?;
        self.write_reg(addr::ILIM, limit.code())
    }

    /// ILIM threshold code (bits 2:0).
    pub fn current_limit_code(&mut self) -> Result<u8, Error<I2C::Error>> {
        Ok(self.read_reg(addr::ILIM)? & ILIM_MASK)
    }

    pub fn control1(&mut self) -> Result<Control1Bits, Error<I2C::Error>> {
        Ok(Control1Bits::from_bits_truncate(self.read_reg(addr::CONTROL1)?))
    }

    pub fn control2(&mut self) -> Result<Control2Bits, Error<I2C::Error>> {
        Ok(Control2Bits::from_bits_truncate(self.read_reg(addr::CONTROL2)?))
    }

    /// Clear every latched fault (INT_STATUS is write-1-to-clear).
    pub fn clear_interrupts(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_reg(addr::INT_STATUS, INT_STATUS_CLEAR_ALL)
    }

    pub fn interrupt_status(&mut self) -> Result<InterruptFlags, Error<I2C::Error>> {
        let bits = InterruptBits::from_bits_truncate(self.read_reg(addr::INT_STATUS)?);
        Ok(bits.into())
    }

    pub fn interrupt_mask(&mut self) -> Result<InterruptBits, Error<I2C::Error>> {
        Ok(InterruptBits::from_bits_truncate(self.read_reg(addr::INT_MASK)?))
    }

    pub fn enable_interrupt(&mut self, irq: Interrupt) -> Result<(), Error<I2C::Error>> {
        self.check_interrupts(irq.bits())?;
        self.update_reg(addr::INT_MASK, irq.bits().bits(), irq.bits().bits())
    }

    pub fn disable_interrupt(&mut self, irq: Interrupt) -> Result<(), Error<I2C::Error>> {
        self.check_interrupts(irq.bits())?;
        self.update_reg(addr::INT_MASK, irq.bits().bits(), 0)
    }

    /// Apply a full configuration. ENPWR, GO_BIT and the reference are left untouched.
    /// Variant checks run before any bus traffic.
    pub fn configure(&mut self, config: &Config) -> Result<(), Error<I2C::Error>> {
        let (control1, control2) = self.config_fields(config)?;
        self.update_reg(addr::CONTROL1, CONFIG_CONTROL1_MASK, control1)?;
        self.update_reg(addr::CONTROL2, CONFIG_CONTROL2_MASK, control2)?;
        if let Some(limit) = config.current_limit {
            self.write_reg(addr::ILIM, limit.code())?;
        }
        self.update_reg(addr::INT_MASK, self.interrupt_field_mask(), config.interrupts.bits())
    }
}

#[cfg(feature = "async")]
impl<I2C> Mpq421x<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    pub async fn write_reg_async(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .await
            .map_err(Error::I2c)
    }

    pub async fn read_reg_async(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .await
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    pub async fn update_reg_async(&mut self, reg: u8, mask: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg_async(reg).await?;
        let new = (cur & !mask) | (value & mask);
        self.write_reg_async(reg, new).await
    }

    async fn set_control1_flag_async(&mut self, flag: Control1Bits, on: bool) -> Result<(), Error<I2C::Error>> {
        let value = if on { flag.bits() } else { 0 };
        self.update_reg_async(addr::CONTROL1, flag.bits(), value).await
    }

    /// Async version of [`Mpq421x::set_reference`]; the settle time is awaited.
    pub async fn set_reference_async<D>(&mut self, code: u16, delay: &mut D) -> Result<(), Error<I2C::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        let (lsb, msb) = Self::check_reference_code(code)?;

        let control1 = self.read_reg_async(addr::CONTROL1).await?;
        if control1 & Control1Bits::ENPWR.bits() != 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!("MPQ421x@{=u8:#x}: stopping switching for reference update", self.address);
            self.write_reg_async(addr::CONTROL1, control1 & !Control1Bits::ENPWR.bits())
                .await?;
        }

        self.commit_reference_async(lsb, msb).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("MPQ421x@{=u8:#x}: settling {=u32} ms", self.address, self.settle_ms);
        delay.delay_ms(self.settle_ms).await;

        self.set_control1_flag_async(Control1Bits::ENPWR, true).await
    }

    pub async fn write_reference_async(&mut self, code: u16) -> Result<(), Error<I2C::Error>> {
        let (lsb, msb) = Self::check_reference_code(code)?;
        self.commit_reference_async(lsb, msb).await
    }

    async fn commit_reference_async(&mut self, lsb: u8, msb: u8) -> Result<(), Error<I2C::Error>> {
        self.write_reg_async(addr::REF_LSB, lsb).await?;
        self.write_reg_async(addr::REF_MSB, msb).await?;
        self.set_go_bit_async().await
    }

    pub async fn set_output_voltage_mv_async<D>(
        &mut self,
        vout_mv: u32,
        divider: &FeedbackDivider,
        delay: &mut D,
    ) -> Result<ReferenceTarget, Error<I2C::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        let target = divider.reference_for(vout_mv);
        self.set_reference_async(target.code, delay).await?;
        Ok(target)
    }

    pub async fn reference_code_async(&mut self) -> Result<u16, Error<I2C::Error>> {
        let lsb = self.read_reg_async(addr::REF_LSB).await?;
        let msb = self.read_reg_async(addr::REF_MSB).await?;
        Ok(join_reference_code(lsb, msb))
    }

    pub async fn enable_power_switching_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag_async(Control1Bits::ENPWR, true).await
    }

    pub async fn disable_power_switching_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag_async(Control1Bits::ENPWR, false).await
    }

    pub async fn is_power_switching_enabled_async(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.control1_async().await?.contains(Control1Bits::ENPWR))
    }

    pub async fn set_go_bit_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag_async(Control1Bits::GO_BIT, true).await
    }

    pub async fn enable_power_good_latch_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag_async(Control1Bits::PNG_LATCH, true).await
    }

    pub async fn disable_power_good_latch_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag_async(Control1Bits::PNG_LATCH, false).await
    }

    pub async fn enable_frequency_dither_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag_async(Control1Bits::DITHER, true).await
    }

    pub async fn disable_frequency_dither_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag_async(Control1Bits::DITHER, false).await
    }

    pub async fn enable_output_discharge_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag_async(Control1Bits::DISCHG, true).await
    }

    pub async fn disable_output_discharge_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_control1_flag_async(Control1Bits::DISCHG, false).await
    }

    pub async fn set_slew_rate_async(&mut self, slew: SlewRate) -> Result<(), Error<I2C::Error>> {
        self.update_reg_async(addr::CONTROL1, CONTROL1_SR_MASK, slew.field()).await
    }

    pub async fn set_switching_frequency_async(&mut self, fsw: SwitchingFrequency) -> Result<(), Error<I2C::Error>> {
        self.update_reg_async(addr::CONTROL2, CONTROL2_FSW_MASK, fsw.field()).await
    }

    pub async fn set_buck_boost_frequency_high_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_reg_async(addr::CONTROL2, Control2Bits::BB_FSW.bits(), Control2Bits::BB_FSW.bits())
            .await
    }

    pub async fn set_buck_boost_frequency_low_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_reg_async(addr::CONTROL2, Control2Bits::BB_FSW.bits(), 0).await
    }

    pub async fn set_ocp_mode_async(&mut self, mode: ProtectionMode) -> Result<(), Error<I2C::Error>> {
        self.update_reg_async(addr::CONTROL2, CONTROL2_OCP_MASK, mode.code() << CONTROL2_OCP_SHIFT)
            .await
    }

    pub async fn set_ovp_mode_async(&mut self, mode: ProtectionMode) -> Result<(), Error<I2C::Error>> {
        self.update_reg_async(addr::CONTROL2, CONTROL2_OVP_MASK, mode.code() << CONTROL2_OVP_SHIFT)
            .await
    }

    pub async fn set_current_limit_async(&mut self, limit: impl Into<CurrentLimit>) -> Result<(), Error<I2C::Error>> {
        let limit = limit.into();
        self.check_current_limit(limit)?;
        self.write_reg_async(addr::ILIM, limit.code()).await
    }

    pub async fn current_limit_code_async(&mut self) -> Result<u8, Error<I2C::Error>> {
        Ok(self.read_reg_async(addr::ILIM).await? & ILIM_MASK)
    }

    pub async fn control1_async(&mut self) -> Result<Control1Bits, Error<I2C::Error>> {
        Ok(Control1Bits::from_bits_truncate(self.read_reg_async(addr::CONTROL1).await?))
    }

    pub async fn control2_async(&mut self) -> Result<Control2Bits, Error<I2C::Error>> {
        Ok(Control2Bits::from_bits_truncate(self.read_reg_async(addr::CONTROL2).await?))
    }

    pub async fn clear_interrupts_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_reg_async(addr::INT_STATUS, INT_STATUS_CLEAR_ALL).await
    }

    pub async fn interrupt_status_async(&mut self) -> Result<InterruptFlags, Error<I2C::Error>> {
        let bits = InterruptBits::from_bits_truncate(self.read_reg_async(addr::INT_STATUS).await?);
        Ok(bits.into())
    }

    pub async fn interrupt_mask_async(&mut self) -> Result<InterruptBits, Error<I2C::Error>> {
        Ok(InterruptBits::from_bits_truncate(self.read_reg_async(addr::INT_MASK).await?))
    }

    pub async fn enable_interrupt_async(&mut self, irq: Interrupt) -> Result<(), Error<I2C::Error>> {
        self.check_interrupts(irq.bits())?;
        self.update_reg_async(addr::INT_MASK, irq.bits().bits(), irq.bits().bits())
            .await
    }

    pub async fn disable_interrupt_async(&mut self, irq: Interrupt) -> Result<(), Error<I2C::Error>> {
        self.check_interrupts(irq.bits())?;
        self.update_reg_async(addr::INT_MASK, irq.bits().bits(), 0).await
    }

    pub async fn configure_async(&mut self, config: &Config) -> Result<(), Error<I2C::Error>> {
        let (control1, control2) = self.config_fields(config)?;
        self.update_reg_async(addr::CONTROL1, CONFIG_CONTROL1_MASK, control1)
            .await?;
        self.update_reg_async(addr::CONTROL2, CONFIG_CONTROL2_MASK, control2)
            .await?;
        if let Some(limit) = config.current_limit {
            self.write_reg_async(addr::ILIM, limit.code()).await?;
        }
        self.update_reg_async(addr::INT_MASK, self.interrupt_field_mask(), config.interrupts.bits())
            .await
    }
}
