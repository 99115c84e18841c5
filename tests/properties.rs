use dtype_codec::class::{
    ByteOrder, FloatBody, IntegerBody, Member, OpaqueBody, Pad, ReferenceBody, ReferenceKind, Sign,
    VlenKind,
};
use dtype_codec::version::{select_version, Version};
use dtype_codec::{decode, encode, predicted_size, Datatype};

fn sample_trees() -> Vec<Datatype> {
    let i32_be = Datatype::integer(
        4,
        IntegerBody {
            byte_order: ByteOrder::Big,
            lsb_pad: Pad::Zero,
            msb_pad: Pad::Zero,
            sign: Sign::TwosComp,
            bit_offset: 0,
            precision: 32,
        },
    );
    let f32_le = Datatype::float(4, FloatBody::ieee_single());
    let array = Datatype::array(Datatype::float(4, FloatBody::ieee_single()), vec![2, 2]).unwrap();
    let compound = Datatype::compound(
        8,
        vec![
            Member::new(
                "a",
                0,
                Datatype::integer(4, IntegerBody::default()),
            )
            .unwrap(),
            Member::new(
                "b",
                4,
                Datatype::integer(4, IntegerBody::default()),
            )
            .unwrap(),
        ],
    )
    .unwrap();
    let opaque = Datatype::opaque(
        8,
        OpaqueBody {
            tag: "myTag".into(),
        },
    );
    let vlen = Datatype::vlen(16, opaque.clone(), VlenKind::Sequence);
    let reference = Datatype::reference(
        8,
        ReferenceBody {
            subtype: ReferenceKind::Object,
        },
    );

    vec![i32_be, f32_le, array, compound, opaque, vlen, reference]
}

#[test]
fn round_trip_is_identity_for_every_sample_tree() {
    for tree in sample_trees() {
        let mut buf = Vec::new();
        encode(&tree, &mut buf, false).unwrap();
        let mut cursor: &[u8] = &buf;
        let back = decode(&mut cursor).unwrap();
        assert_eq!(cursor.len(), 0, "decoder must consume exactly one tree");
        assert_eq!(back, tree);
    }
}

#[test]
fn predicted_size_agrees_with_encoder_for_every_sample_tree() {
    for tree in sample_trees() {
        for use_latest in [false, true] {
            let mut buf = Vec::new();
            encode(&tree, &mut buf, use_latest).unwrap();
            assert_eq!(predicted_size(&tree, use_latest).unwrap(), buf.len());
        }
    }
}

#[test]
fn version_minimality_holds_across_samples() {
    let plain = Datatype::integer(4, IntegerBody::default());
    assert_eq!(select_version(&plain, false), Version::V1);

    let with_array = Datatype::array(Datatype::integer(4, IntegerBody::default()), vec![2]).unwrap();
    assert_eq!(select_version(&with_array, false), Version::V2);

    let mut vax = FloatBody::ieee_single();
    vax.byte_order = ByteOrder::Vax;
    let with_vax = Datatype::float(4, vax);
    assert_eq!(select_version(&with_vax, false), Version::V3);

    // A VAX float nested inside an array must still force V3, not V2.
    let vax_in_array = Datatype::array(with_vax, vec![3]).unwrap();
    assert_eq!(select_version(&vax_in_array, false), Version::V3);
}

#[test]
fn every_truncated_prefix_of_a_compound_encoding_is_rejected() {
    let tree = Datatype::compound(
        8,
        vec![
            Member::new("a", 0, Datatype::integer(4, IntegerBody::default())).unwrap(),
            Member::new("b", 4, Datatype::integer(4, IntegerBody::default())).unwrap(),
        ],
    )
    .unwrap();
    let mut buf = Vec::new();
    encode(&tree, &mut buf, true).unwrap();

    for cut in 1..buf.len() {
        let prefix = &buf[..cut];
        let mut cursor: &[u8] = prefix;
        assert_eq!(
            decode(&mut cursor),
            Err(dtype_codec::Error::TruncatedBuffer),
            "prefix of length {cut} should be rejected as truncated"
        );
    }
}

#[test]
fn force_convert_propagates_from_vlen_descendant_but_not_from_plain_trees() {
    let plain = Datatype::compound(
        8,
        vec![
            Member::new("a", 0, Datatype::integer(4, IntegerBody::default())).unwrap(),
            Member::new("b", 4, Datatype::float(4, FloatBody::ieee_single())).unwrap(),
        ],
    )
    .unwrap();
    assert!(!plain.force_convert());

    let opaque = Datatype::opaque(
        8,
        OpaqueBody {
            tag: "x".into(),
        },
    );
    let vlen = Datatype::vlen(16, opaque, VlenKind::Sequence);
    let wrapped = Datatype::compound(16, vec![Member::new("v", 0, vlen).unwrap()]).unwrap();
    assert!(wrapped.force_convert());
}

#[test]
fn compound_offset_invariant_matches_packed_flag() {
    let packed = Datatype::compound(
        8,
        vec![
            Member::new("a", 0, Datatype::integer(4, IntegerBody::default())).unwrap(),
            Member::new("b", 4, Datatype::integer(4, IntegerBody::default())).unwrap(),
        ],
    )
    .unwrap();
    assert!(packed.is_packed());

    let gapped = Datatype::compound(
        16,
        vec![
            Member::new("a", 0, Datatype::integer(4, IntegerBody::default())).unwrap(),
            Member::new("b", 8, Datatype::integer(4, IntegerBody::default())).unwrap(),
        ],
    )
    .unwrap();
    assert!(!gapped.is_packed());

    let overrun = Datatype::compound(
        4,
        vec![Member::new("a", 2, Datatype::integer(4, IntegerBody::default())).unwrap()],
    );
    assert!(overrun.is_err());
}
