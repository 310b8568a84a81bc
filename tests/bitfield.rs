use proptest::prelude::*;
use rasp4_io::board::{GPIO_BASE, GPIO_MAX_PIN};
use rasp4_io::mmio::ShadowBus;
use rasp4_io::{set_field, Bank, Error, Operand, Width};

const BASE: usize = GPIO_BASE;

fn width() -> impl Strategy<Value = Width> {
    prop_oneof![Just(Width::One), Just(Width::Two), Just(Width::Three)]
}

proptest! {
    #[test]
    fn set_field_changes_only_the_target_field(
        width in width(),
        index in 0u32..=GPIO_MAX_PIN,
        raw in any::<u32>(),
        background in prop::array::uniform9(any::<u32>()),
    ) {
        let value = raw & width.mask();
        let bus = ShadowBus::<16>::new();
        // One register below the bank, then the bank and what follows it.
        let first = BASE - 4;
        for (i, word) in background.iter().enumerate() {
            bus.poke(first + i * 4, *word);
        }

        prop_assert_eq!(set_field(&bus, BASE, index, value, width, GPIO_MAX_PIN), Ok(()));

        let bank = Bank::new(BASE, width, GPIO_MAX_PIN);
        prop_assert_eq!(bank.read(&bus, index), Ok(value));

        let loc = bank.locate(index).unwrap();
        let field = width.mask() << loc.shift;
        for (i, word) in background.iter().enumerate() {
            let address = first + i * 4;
            if address == loc.address {
                prop_assert_eq!(bus.peek(address) & !field, word & !field);
            } else {
                prop_assert_eq!(bus.peek(address), *word);
            }
        }
        prop_assert_eq!(bus.writes(), 1);
    }

    #[test]
    fn index_past_max_writes_nothing(
        width in width(),
        index in (GPIO_MAX_PIN + 1)..,
        raw in any::<u32>(),
    ) {
        let bus = ShadowBus::<4>::new();
        let value = raw & width.mask();

        prop_assert_eq!(
            set_field(&bus, BASE, index, value, width, GPIO_MAX_PIN),
            Err(Error::OutOfRange { operand: Operand::Index, got: index, max: GPIO_MAX_PIN })
        );
        prop_assert_eq!(bus.writes(), 0);
    }

    #[test]
    fn value_wider_than_field_writes_nothing(
        width in width(),
        index in 0u32..=GPIO_MAX_PIN,
        raw in any::<u32>(),
    ) {
        let bus = ShadowBus::<4>::new();
        let value = raw | (1 << width.bits());

        prop_assert_eq!(
            set_field(&bus, BASE, index, value, width, GPIO_MAX_PIN),
            Err(Error::OutOfRange { operand: Operand::Value, got: value, max: width.mask() })
        );
        prop_assert_eq!(bus.writes(), 0);
    }

    #[test]
    fn next_register_holds_the_same_shift(width in width(), index in 0u32..10_000) {
        let bank = Bank::new(BASE, width, u32::MAX);
        let here = bank.locate(index).unwrap();
        let next = bank.locate(index + width.fields_per_register()).unwrap();

        prop_assert_eq!(next.address, here.address + 4);
        prop_assert_eq!(next.shift, here.shift);
    }

    #[test]
    fn misaligned_bank_writes_nothing(width in width(), offset in 1usize..4, index in 0u32..=GPIO_MAX_PIN) {
        let bus = ShadowBus::<4>::new();

        prop_assert_eq!(
            set_field(&bus, BASE + offset, index, 0, width, GPIO_MAX_PIN),
            Err(Error::Misaligned { address: BASE + offset })
        );
        prop_assert_eq!(bus.writes(), 0);
    }
}

#[test]
fn every_pin_fits_in_its_bank() {
    // GPFSEL0..5, GPSET0..1, GPIO_PUP_PDN_CNTRL_REG0..3
    for (width, registers) in [(Width::Three, 6), (Width::One, 2), (Width::Two, 4)] {
        let bank = Bank::new(BASE, width, GPIO_MAX_PIN);
        let last = bank.locate(GPIO_MAX_PIN).unwrap();
        assert_eq!(last.address, BASE + (registers - 1) * 4);
        assert!(last.shift + width.bits() <= 32);
    }
}
