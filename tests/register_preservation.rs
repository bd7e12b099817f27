mod common;

use common::{Event, FakeBus, FakeDelay, writes};
use embedded_hal::i2c::ErrorKind;
use mpq421x_rs::data_types::{
    Config, I2cAddress, Interrupt, Mpq4214Ilim, ProtectionMode, SlewRate, SwitchingFrequency, Variant,
};
use mpq421x_rs::registers::{InterruptBits, REGISTER_COUNT, addr, join_reference_code};
use mpq421x_rs::{Error, Mpq421x};

type Driver = Mpq421x<FakeBus>;
type Accessor = fn(&mut Driver) -> Result<(), Error<ErrorKind>>;

const ADDR: u8 = 0x62;

/// (register, field mask, accessor)
const ACCESSORS: &[(u8, u8, Accessor)] = &[
    (addr::CONTROL1, 0b0000_0001, |d: &mut Driver| d.enable_power_switching()),
    (addr::CONTROL1, 0b0000_0001, |d: &mut Driver| d.disable_power_switching()),
    (addr::CONTROL1, 0b0000_0010, |d: &mut Driver| d.set_go_bit()),
    (addr::CONTROL1, 0b0000_1000, |d: &mut Driver| d.enable_power_good_latch()),
    (addr::CONTROL1, 0b0000_1000, |d: &mut Driver| d.disable_power_good_latch()),
    (addr::CONTROL1, 0b0001_0000, |d: &mut Driver| d.enable_frequency_dither()),
    (addr::CONTROL1, 0b0001_0000, |d: &mut Driver| d.disable_frequency_dither()),
    (addr::CONTROL1, 0b0010_0000, |d: &mut Driver| d.enable_output_discharge()),
    (addr::CONTROL1, 0b0010_0000, |d: &mut Driver| d.disable_output_discharge()),
    (addr::CONTROL1, 0b1100_0000, |d: &mut Driver| d.set_slew_rate(SlewRate::Sr38MvPerMs)),
    (addr::CONTROL1, 0b1100_0000, |d: &mut Driver| d.set_slew_rate(SlewRate::Sr75MvPerMs)),
    (addr::CONTROL2, 0b1100_0000, |d: &mut Driver| d.set_switching_frequency(SwitchingFrequency::Khz300)),
    (addr::CONTROL2, 0b1100_0000, |d: &mut Driver| d.set_switching_frequency(SwitchingFrequency::Khz600)),
    (addr::CONTROL2, 0b0001_0000, |d: &mut Driver| d.set_buck_boost_frequency_high()),
    (addr::CONTROL2, 0b0001_0000, |d: &mut Driver| d.set_buck_boost_frequency_low()),
    (addr::CONTROL2, 0b0000_1100, |d: &mut Driver| d.set_ocp_mode(ProtectionMode::Hiccup)),
    (addr::CONTROL2, 0b0000_1100, |d: &mut Driver| d.set_ocp_mode(ProtectionMode::None)),
    (addr::CONTROL2, 0b0000_0011, |d: &mut Driver| d.set_ovp_mode(ProtectionMode::Latch)),
    (addr::CONTROL2, 0b0000_0011, |d: &mut Driver| d.set_ovp_mode(ProtectionMode::Hiccup)),
    (addr::INT_MASK, 0b0001_0000, |d: &mut Driver| d.enable_interrupt(Interrupt::OverTemperature)),
    (addr::INT_MASK, 0b0000_1000, |d: &mut Driver| d.disable_interrupt(Interrupt::ConstantCurrent)),
    (addr::INT_MASK, 0b0000_0100, |d: &mut Driver| d.enable_interrupt(Interrupt::OverVoltage)),
    (addr::INT_MASK, 0b0000_0010, |d: &mut Driver| d.disable_interrupt(Interrupt::OverCurrent)),
    (addr::INT_MASK, 0b0000_0001, |d: &mut Driver| d.enable_interrupt(Interrupt::PowerGood)),
];

fn driver_with(regs: [u8; REGISTER_COUNT]) -> (Driver, common::Log) {
    let (bus, log) = FakeBus::new(ADDR, regs);
    (Mpq421x::with_address(bus, Variant::Mpq4214, ADDR), log)
}

proptest::proptest! {
    /// Bits outside an accessor's field are written back exactly as they were read.
    #[test]
    fn accessors_preserve_unrelated_bits(seed in proptest::array::uniform7(proptest::num::u8::ANY)) {
        for (index, &(reg, mask, accessor)) in ACCESSORS.iter().enumerate() {
            let (mut driver, log) = driver_with(seed);
            accessor(&mut driver).unwrap();

            let events = log.borrow().clone();
            proptest::prop_assert_eq!(events.len(), 2, "accessor #{}", index);
            proptest::prop_assert_eq!(events[0], Event::Read(reg));
            let Event::Write(written_reg, value) = events[1] else {
                panic!("accessor #{} did not write", index);
            };
            proptest::prop_assert_eq!(written_reg, reg);
            proptest::prop_assert_eq!(value & !mask, seed[reg as usize] & !mask, "accessor #{}", index);

            let regs = driver.free().regs;
            for other in 0..REGISTER_COUNT {
                if other != reg as usize {
                    proptest::prop_assert_eq!(regs[other], seed[other]);
                }
            }
        }
    }

    /// Enabling then disabling an interrupt restores the mask register.
    #[test]
    fn interrupt_enable_disable_restores_mask(mask in proptest::num::u8::ANY) {
        for irq in Interrupt::ALL {
            let start = mask & !irq.bits().bits();
            let mut regs = [0u8; REGISTER_COUNT];
            regs[addr::INT_MASK as usize] = start;
            let (mut driver, _log) = driver_with(regs);

            driver.enable_interrupt(irq).unwrap();
            proptest::prop_assert!(driver.interrupt_mask().unwrap().contains(irq.bits()));
            driver.disable_interrupt(irq).unwrap();
            proptest::prop_assert_eq!(driver.free().regs[addr::INT_MASK as usize], start);
        }
    }

    /// Whatever code is requested, the two reference registers reassemble it.
    #[test]
    fn reference_registers_reassemble_code(code in 0u16..=2_047) {
        let (mut driver, _log) = driver_with([0; REGISTER_COUNT]);
        driver.write_reference(code).unwrap();
        proptest::prop_assert_eq!(driver.reference_code().unwrap(), code);
        let regs = driver.free().regs;
        proptest::prop_assert_eq!(
            join_reference_code(regs[addr::REF_LSB as usize], regs[addr::REF_MSB as usize]),
            code
        );
    }
}

#[test]
fn set_reference_orders_bus_and_delay() {
    let mut regs = [0u8; REGISTER_COUNT];
    regs[addr::CONTROL1 as usize] = 0b0101_0001;
    let (mut driver, log) = driver_with(regs);
    let mut delay = FakeDelay::new(&log);

    driver.set_reference(1_100, &mut delay).unwrap();

    let events = log.borrow().clone();
    assert_eq!(
        events,
        vec![
            Event::Read(addr::CONTROL1),
            Event::Write(addr::CONTROL1, 0b0101_0000),
            Event::Write(addr::REF_LSB, 0b100),
            Event::Write(addr::REF_MSB, 0b1000_1001),
            Event::Read(addr::CONTROL1),
            Event::Write(addr::CONTROL1, 0b0101_0010),
            Event::DelayNs(200_000_000),
            Event::Read(addr::CONTROL1),
            Event::Write(addr::CONTROL1, 0b0101_0011),
        ]
    );
}

#[test]
fn settle_time_is_configurable() {
    let (mut driver, log) = driver_with([0; REGISTER_COUNT]);
    let mut delay = FakeDelay::new(&log);
    assert_eq!(driver.settle_time_ms(), 200);
    driver.set_settle_time_ms(350);

    driver.set_reference(42, &mut delay).unwrap();

    let slept: u64 = log
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::DelayNs(ns) => Some(*ns),
            _ => None,
        })
        .sum();
    assert_eq!(slept, 350_000_000);
    assert!(driver.is_power_switching_enabled().unwrap());
}

#[test]
fn settle_time_never_drops_below_floor() {
    let (mut driver, log) = driver_with([0; REGISTER_COUNT]);
    let mut delay = FakeDelay::new(&log);
    driver.set_settle_time_ms(0);
    assert_eq!(driver.settle_time_ms(), 200);
    driver.set_settle_time_ms(199);
    assert_eq!(driver.settle_time_ms(), 200);

    driver.set_reference(42, &mut delay).unwrap();

    assert!(log.borrow().contains(&Event::DelayNs(200_000_000)));
}

#[test]
fn preset_address_respects_variant() {
    let (bus, _log) = FakeBus::new(0x62, [0; REGISTER_COUNT]);
    assert!(matches!(
        Mpq421x::with_preset_address(bus, Variant::Mpq4210, I2cAddress::Addr0x62),
        Err(Error::InvalidConfig)
    ));

    let (bus, _log) = FakeBus::new(0x64, [0; REGISTER_COUNT]);
    let Ok(mut driver) = Mpq421x::with_preset_address(bus, Variant::Mpq4214, I2cAddress::Addr0x64) else {
        panic!("0x64 is a valid MPQ4214 preset");
    };
    assert_eq!(driver.address(), 0x64);
    driver.enable_power_switching().unwrap();

    let (bus, _log) = FakeBus::new(0x66, [0; REGISTER_COUNT]);
    let Ok(driver) = Mpq421x::with_preset_address(bus, Variant::Mpq4210, I2cAddress::Addr0x66) else {
        panic!("0x66 is a valid MPQ4210 preset");
    };
    assert_eq!(driver.address(), 0x66);
}

#[test]
fn failed_read_is_an_error_not_zero() {
    let (mut bus, log) = FakeBus::new(ADDR, [0; REGISTER_COUNT]);
    bus.fail_reads_of = Some(addr::REF_MSB);
    let mut driver = Mpq421x::with_address(bus, Variant::Mpq4210, ADDR);
    assert!(matches!(driver.reference_code(), Err(Error::I2c(ErrorKind::NoAcknowledge(_)))));
    assert_eq!(log.borrow().as_slice(), &[Event::Read(addr::REF_LSB)]);
}

#[test]
fn wrong_address_surfaces_nack() {
    let (bus, _log) = FakeBus::new(ADDR, [0; REGISTER_COUNT]);
    let mut driver = Mpq421x::new(bus, Variant::Mpq4214);
    assert!(matches!(driver.enable_power_switching(), Err(Error::I2c(_))));
}

#[test]
fn clear_interrupts_resets_status() {
    let mut regs = [0u8; REGISTER_COUNT];
    regs[addr::INT_STATUS as usize] = 0b0001_0110;
    let (mut driver, log) = driver_with(regs);
    assert!(driver.interrupt_status().unwrap().any());
    driver.clear_interrupts().unwrap();
    assert!(!driver.interrupt_status().unwrap().any());
    assert_eq!(writes(&log), vec![(addr::INT_STATUS, 0xFF)]);
}

#[test]
fn configure_keeps_enpwr_go_bit_and_reference() {
    let mut regs = [0u8; REGISTER_COUNT];
    regs[addr::REF_LSB as usize] = 0x05;
    regs[addr::REF_MSB as usize] = 0x42;
    regs[addr::CONTROL1 as usize] = 0xFF;
    regs[addr::CONTROL2 as usize] = 0xFF;
    regs[addr::ILIM as usize] = 0x03;
    regs[addr::INT_MASK as usize] = 0xFF;
    let (mut driver, _log) = driver_with(regs);

    driver.configure(&Config::default()).unwrap();

    let regs = driver.free().regs;
    assert_eq!(regs[addr::REF_LSB as usize], 0x05);
    assert_eq!(regs[addr::REF_MSB as usize], 0x42);
    // ENPWR, GO_BIT and reserved bit 2 survive
    assert_eq!(regs[addr::CONTROL1 as usize], 0b0000_0111);
    // reserved bit 5 survives
    assert_eq!(regs[addr::CONTROL2 as usize], 0b0010_0000);
    // no limit requested, ILIM untouched
    assert_eq!(regs[addr::ILIM as usize], 0x03);
    // reserved bits 7:5 survive
    assert_eq!(regs[addr::INT_MASK as usize], 0b1110_0000);
}

#[test]
fn configure_applies_every_field() {
    let (mut driver, _log) = driver_with([0; REGISTER_COUNT]);
    let config = Config {
        slew_rate: SlewRate::Sr50MvPerMs,
        output_discharge: true,
        frequency_dither: true,
        power_good_latch: false,
        switching_frequency: SwitchingFrequency::Khz600,
        buck_boost_frequency_high: true,
        ocp_mode: ProtectionMode::Hiccup,
        ovp_mode: ProtectionMode::Latch,
        current_limit: Some(Mpq4214Ilim::Mv45.into()),
        interrupts: InterruptBits::OTP | InterruptBits::CC,
    };

    driver.configure(&config).unwrap();

    assert_eq!(driver.control1().unwrap().bits(), 0b0111_0000);
    assert_eq!(driver.control2().unwrap().bits(), 0b1101_0110);
    assert_eq!(driver.current_limit_code().unwrap(), 3);
    assert_eq!(driver.interrupt_mask().unwrap(), InterruptBits::OTP | InterruptBits::CC);
}

#[test]
fn configure_rejects_cc_on_mpq4210_without_writing() {
    let (bus, log) = FakeBus::new(ADDR, [0; REGISTER_COUNT]);
    let mut driver = Mpq421x::with_address(bus, Variant::Mpq4210, ADDR);
    let config = Config {
        interrupts: InterruptBits::CC,
        ..Config::default()
    };
    assert_eq!(driver.configure(&config), Err(Error::InvalidConfig));
    assert!(log.borrow().is_empty());
}

#[test]
fn configure_on_mpq4210_leaves_reserved_interrupt_bit() {
    for start in [0x00u8, 0xFF] {
        let mut regs = [0u8; REGISTER_COUNT];
        regs[addr::INT_MASK as usize] = start;
        let (bus, _log) = FakeBus::new(ADDR, regs);
        let mut driver = Mpq421x::with_address(bus, Variant::Mpq4210, ADDR);
        let config = Config {
            interrupts: InterruptBits::OVP,
            ..Config::default()
        };

        driver.configure(&config).unwrap();

        let int_mask = driver.free().regs[addr::INT_MASK as usize];
        assert_eq!(int_mask & InterruptBits::CC.bits(), start & InterruptBits::CC.bits());
        assert_eq!(int_mask & InterruptBits::MPQ4210_ALL.bits(), InterruptBits::OVP.bits());
    }
}
