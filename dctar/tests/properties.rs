use dctar::{Codec, ErrorKind, Format, Limits};
use proptest::prelude::*;

fn format() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Gzip), Just(Format::Zlib)]
}

fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..4096),
        // Low-entropy input exercises back-references.
        prop::collection::vec(0u8..4, 0..16384),
    ]
}

proptest! {
    #[test]
    fn round_trip(format in format(), data in payload()) {
        let codec = Codec::default();
        let packed = codec.compress(format, &data).unwrap();
        prop_assert_eq!(codec.decompress_as(format, &packed).unwrap(), data.clone());

        let (detected, out) = codec.decompress(&packed).unwrap();
        prop_assert_eq!(detected, format);
        prop_assert_eq!(out, data);
    }

    #[test]
    fn truncated_stream_is_corruption(
        format in format(),
        data in payload(),
        cut in 1usize..64,
    ) {
        let codec = Codec::default();
        let packed = codec.compress(format, &data).unwrap();
        let len = packed.len().saturating_sub(cut);
        let err = codec.decompress_as(format, &packed[..len]).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Corruption);
    }

    #[test]
    fn limit_below_output_len_is_rejected(format in format(), data in payload()) {
        prop_assume!(!data.is_empty());
        let packed = Codec::default().compress(format, &data).unwrap();

        let codec = Codec::new(Limits::new(data.len() - 1));
        let err = codec.decompress_as(format, &packed).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::SizeLimit);

        let codec = Codec::new(Limits::new(data.len()));
        prop_assert_eq!(codec.decompress_as(format, &packed).unwrap(), data);
    }

    #[test]
    fn arbitrary_input_never_panics(format in format(), data in prop::collection::vec(any::<u8>(), 0..512)) {
        let codec = Codec::new(Limits::new(1 << 16));
        let _ = codec.decompress_as(format, &data);
        let _ = codec.decompress(&data);
    }
}
