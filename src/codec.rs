//! Recursive depth-first encode/decode driver.
//!
//! Every node, including nested parents and compound members, carries its
//! own 8-byte prelude; the version nibble is decided once for the whole
//! tree by [`crate::version::select_version`] and stamped onto every node
//! the encoder writes. The decoder trusts whatever nibble each node's own
//! prelude carries.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::class::compound::{self, offset_nbytes};
use crate::class::{
    enum_, ArrayBody, BitFieldBody, Class, CompoundBody, EnumBody, EnumMember, FloatBody,
    IntegerBody, Member, OpaqueBody, ReferenceBody, StringBody, TimeBody, VlenBody,
};
use crate::class::common::aligned_len;
use crate::datatype::Datatype;
use crate::error::{Error, Result};
use crate::header::{read_prelude, write_prelude, Prelude};
use crate::io::{Input, Output};
use crate::share::Location;
use crate::version::{select_version, Version};

/// Encode `tree`, deciding the wire version once up front from its
/// features (and `use_latest`, which always wins).
pub fn encode(tree: &Datatype, out: &mut impl Output, use_latest: bool) -> Result<()> {
    let version = select_version(tree, use_latest);
    encode_node(tree, version, out)
}

/// Decode exactly one datatype from `input`, advancing the cursor past it.
pub fn decode(input: &mut impl Input) -> Result<Datatype> {
    decode_node(input)
}

fn encode_node(tree: &Datatype, version: Version, out: &mut impl Output) -> Result<()> {
    match tree.body() {
        crate::class::ClassBody::Integer(body) => {
            write_prelude(out, Class::Integer, version, body.encode_flags()?, tree.size())?;
            body.encode_body(out)
        }
        crate::class::ClassBody::BitField(body) => {
            write_prelude(out, Class::BitField, version, body.encode_flags()?, tree.size())?;
            body.encode_body(out)
        }
        crate::class::ClassBody::Float(body) => {
            write_prelude(
                out,
                Class::Float,
                version,
                body.encode_flags(version)?,
                tree.size(),
            )?;
            body.encode_body(out)
        }
        crate::class::ClassBody::Time(body) => {
            write_prelude(out, Class::Time, version, body.encode_flags()?, tree.size())?;
            body.encode_body(out)
        }
        crate::class::ClassBody::String(body) => {
            write_prelude(out, Class::String, version, body.encode_flags(), tree.size())
        }
        crate::class::ClassBody::Opaque(body) => {
            write_prelude(
                out,
                Class::Opaque,
                version,
                body.encode_flags()?,
                tree.size(),
            )?;
            body.encode_body(out)
        }
        crate::class::ClassBody::Reference(body) => write_prelude(
            out,
            Class::Reference,
            version,
            body.encode_flags(),
            tree.size(),
        ),
        crate::class::ClassBody::Compound(body) => encode_compound(tree, body, version, out),
        crate::class::ClassBody::Enum(body) => encode_enum(tree, body, version, out),
        crate::class::ClassBody::Vlen(body) => encode_vlen(tree, body, version, out),
        crate::class::ClassBody::Array(body) => encode_array(tree, body, version, out),
    }
}

fn encode_compound(
    tree: &Datatype,
    body: &CompoundBody,
    version: Version,
    out: &mut impl Output,
) -> Result<()> {
    write_prelude(out, Class::Compound, version, body.encode_flags()?, tree.size())?;
    let offset_w = offset_nbytes(tree.size());
    for m in &body.members {
        write_member_name(out, &m.name, version)?;
        if version >= Version::V3 {
            write_varint(out, m.offset, offset_w)?;
        } else {
            out.write(&m.offset.to_le_bytes())?;
        }
        if version == Version::V1 {
            // Legacy intrinsic-array header, always written as zero: this
            // synthesized tree never carries one, it only ever reads one.
            for _ in 0..28u8 {
                out.push_byte(0)?;
            }
        }
        encode_node(&m.ty, version, out)?;
    }
    Ok(())
}

fn encode_enum(
    tree: &Datatype,
    body: &EnumBody,
    version: Version,
    out: &mut impl Output,
) -> Result<()> {
    write_prelude(out, Class::Enum, version, body.encode_flags()?, tree.size())?;
    let parent = tree
        .parent()
        .expect("enum datatype always has a parent");
    encode_node(parent, version, out)?;
    for m in &body.members {
        write_member_name(out, &m.name, version)?;
    }
    for m in &body.members {
        out.write(&m.raw_value)?;
    }
    Ok(())
}

fn encode_vlen(
    tree: &Datatype,
    body: &VlenBody,
    version: Version,
    out: &mut impl Output,
) -> Result<()> {
    write_prelude(out, Class::Vlen, version, body.encode_flags(), tree.size())?;
    let parent = tree.parent().expect("vlen datatype always has a parent");
    encode_node(parent, version, out)
}

fn encode_array(
    tree: &Datatype,
    body: &ArrayBody,
    version: Version,
    out: &mut impl Output,
) -> Result<()> {
    write_prelude(out, Class::Array, version, 0, tree.size())?;
    out.push_byte(body.ndims() as u8)?;
    if version < Version::V3 {
        out.write(&[0, 0, 0])?;
    }
    for &d in &body.dims {
        out.write(&d.to_le_bytes())?;
    }
    if version < Version::V3 {
        for i in 0..body.ndims() as u32 {
            out.write(&i.to_le_bytes())?;
        }
    }
    let parent = tree.parent().expect("array datatype always has a parent");
    encode_node(parent, version, out)
}

fn decode_node(input: &mut impl Input) -> Result<Datatype> {
    let prelude = read_prelude(input)?;
    match prelude.class {
        Class::Integer => {
            let (order, lsb, msb, sign) = IntegerBody::decode_flags(prelude.flags)?;
            let body = IntegerBody::decode_body(input, order, lsb, msb, sign)?;
            Ok(Datatype::integer(prelude.size, body))
        }
        Class::BitField => {
            let (order, lsb, msb) = BitFieldBody::decode_flags(prelude.flags)?;
            let body = BitFieldBody::decode_body(input, order, lsb, msb)?;
            Ok(Datatype::bitfield(prelude.size, body))
        }
        Class::Float => {
            let body = FloatBody::decode_flags_and_body(prelude.flags, prelude.version, input)?;
            Ok(Datatype::float(prelude.size, body))
        }
        Class::Time => {
            let body = TimeBody::decode_flags_and_body(prelude.flags, input)?;
            Ok(Datatype::time(prelude.size, body))
        }
        Class::String => {
            let body = StringBody::decode_flags(prelude.flags)?;
            Ok(Datatype::string(prelude.size, body))
        }
        Class::Opaque => {
            let body = OpaqueBody::decode(prelude.flags, input)?;
            Ok(Datatype::opaque(prelude.size, body))
        }
        Class::Reference => {
            let body = ReferenceBody::decode_flags(prelude.flags)?;
            Ok(Datatype::reference(prelude.size, body))
        }
        Class::Compound => decode_compound(prelude, input),
        Class::Enum => decode_enum(prelude, input),
        Class::Vlen => decode_vlen(prelude, input),
        Class::Array => decode_array(prelude, input),
    }
}

fn decode_compound(prelude: Prelude, input: &mut impl Input) -> Result<Datatype> {
    let count = compound::member_count(prelude.flags);
    let offset_w = offset_nbytes(prelude.size);
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_member_name(input, prelude.version)?;
        let offset = if prelude.version >= Version::V3 {
            read_varint(input, offset_w)?
        } else {
            read_u32(input)?
        };

        let mut legacy_dims: Option<Vec<u32>> = None;
        if prelude.version == Version::V1 {
            let ndims = input.read_byte()? as usize;
            if ndims > 4 {
                return Err(Error::OutOfMemory);
            }
            input.skip(3)?;
            input.skip(4)?; // permutation
            input.skip(4)?; // reserved
            let mut dims = [0u32; 4];
            for d in dims.iter_mut() {
                *d = read_u32(input)?;
            }
            if ndims > 0 {
                legacy_dims = Some(dims[..ndims].to_vec());
            }
        }

        let member_ty = decode_node(input)?;
        let member_ty = match legacy_dims {
            Some(dims) => Datatype::array(member_ty, dims)?,
            None => member_ty,
        };
        members.push(Member::new(name, offset, member_ty)?);
    }
    Datatype::compound(prelude.size, members)
}

fn decode_enum(prelude: Prelude, input: &mut impl Input) -> Result<Datatype> {
    let parent = decode_node(input)?;
    let count = enum_::member_count(prelude.flags);
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        names.push(read_member_name(input, prelude.version)?);
    }
    let mut members = Vec::with_capacity(count);
    for name in names {
        let mut raw_value = vec![0u8; parent.size() as usize];
        input.read(&mut raw_value)?;
        members.push(EnumMember { name, raw_value });
    }
    Datatype::r#enum(parent, members)
}

fn decode_vlen(prelude: Prelude, input: &mut impl Input) -> Result<Datatype> {
    let body = VlenBody::decode_flags(prelude.flags)?;
    let parent = decode_node(input)?;
    let mut dt = Datatype::vlen(prelude.size, parent, body.subtype);
    dt.set_location(Location::Disk);
    Ok(dt)
}

fn decode_array(prelude: Prelude, input: &mut impl Input) -> Result<Datatype> {
    let ndims = input.read_byte()? as usize;
    if prelude.version < Version::V3 {
        input.skip(3)?;
    }
    let mut dims = Vec::with_capacity(ndims);
    for _ in 0..ndims {
        dims.push(read_u32(input)?);
    }
    if prelude.version < Version::V3 {
        input.skip(ndims * 4)?;
    }
    let parent = decode_node(input)?;
    Datatype::array(parent, dims)
}

fn write_member_name(out: &mut impl Output, name: &str, version: Version) -> Result<()> {
    out.write(name.as_bytes())?;
    out.push_byte(0)?;
    if version < Version::V3 {
        let total = aligned_len(name.len() + 1);
        for _ in (name.len() + 1)..total {
            out.push_byte(0)?;
        }
    }
    Ok(())
}

fn read_member_name(input: &mut impl Input, version: Version) -> Result<String> {
    let mut bytes = Vec::new();
    loop {
        let b = input.read_byte()?;
        if b == 0 {
            break;
        }
        bytes.push(b);
    }
    if version < Version::V3 {
        let total = aligned_len(bytes.len() + 1);
        input.skip(total - (bytes.len() + 1))?;
    }
    String::from_utf8(bytes).map_err(|_| Error::OutOfMemory)
}

fn write_varint(out: &mut impl Output, value: u32, nbytes: usize) -> Result<()> {
    let bytes = value.to_le_bytes();
    out.write(&bytes[..nbytes])
}

fn read_varint(input: &mut impl Input, nbytes: usize) -> Result<u32> {
    let mut buf = [0u8; 4];
    input.read(&mut buf[..nbytes])?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u32(input: &mut impl Input) -> Result<u32> {
    let mut buf = [0u8; 4];
    input.read(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ByteOrder, Pad, Sign};

    fn seed_scalar_i32() -> Datatype {
        Datatype::integer(
            4,
            IntegerBody {
                byte_order: ByteOrder::Big,
                lsb_pad: Pad::Zero,
                msb_pad: Pad::Zero,
                sign: Sign::TwosComp,
                bit_offset: 0,
                precision: 32,
            },
        )
    }

    #[test]
    fn scalar_i32_matches_seed_scenario_bytes() {
        let dt = seed_scalar_i32();
        let mut buf = Vec::new();
        encode(&dt, &mut buf, false).unwrap();
        assert_eq!(
            buf,
            vec![0x10, 0x09, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x00]
        );
    }

    #[test]
    fn scalar_roundtrips() {
        let dt = seed_scalar_i32();
        let mut buf = Vec::new();
        encode(&dt, &mut buf, false).unwrap();
        let mut cursor: &[u8] = &buf;
        let back = decode(&mut cursor).unwrap();
        assert_eq!(cursor.len(), 0);
        assert_eq!(back, dt);
    }

    #[test]
    fn array_of_float_roundtrips_as_v2() {
        let leaf = Datatype::float(4, FloatBody::ieee_single());
        let arr = Datatype::array(leaf, vec![3, 4]).unwrap();
        let mut buf = Vec::new();
        encode(&arr, &mut buf, false).unwrap();
        let mut cursor: &[u8] = &buf;
        let back = decode(&mut cursor).unwrap();
        assert_eq!(back, arr);
    }

    #[test]
    fn compound_with_nested_members_roundtrips() {
        let a = seed_scalar_i32();
        let b = Datatype::float(4, FloatBody::ieee_single());
        let dt = Datatype::compound(
            8,
            vec![
                Member::new("a", 0, a).unwrap(),
                Member::new("b", 4, b).unwrap(),
            ],
        )
        .unwrap();
        let mut buf = Vec::new();
        encode(&dt, &mut buf, false).unwrap();
        let mut cursor: &[u8] = &buf;
        let back = decode(&mut cursor).unwrap();
        assert_eq!(back, dt);
    }

    #[test]
    fn vlen_of_opaque_is_force_convert_and_marks_disk_on_decode() {
        let base = Datatype::opaque(
            8,
            OpaqueBody {
                tag: "myTag".into(),
            },
        );
        let dt = Datatype::vlen(16, base, crate::class::VlenKind::Sequence);
        assert!(dt.force_convert());
        let mut buf = Vec::new();
        encode(&dt, &mut buf, false).unwrap();
        let mut cursor: &[u8] = &buf;
        let back = decode(&mut cursor).unwrap();
        assert_eq!(back.location(), Location::Disk);
    }

    #[test]
    fn truncated_input_is_rejected_not_panicked() {
        let dt = seed_scalar_i32();
        let mut buf = Vec::new();
        encode(&dt, &mut buf, false).unwrap();
        buf.truncate(buf.len() - 1);
        let mut cursor: &[u8] = &buf;
        assert_eq!(decode(&mut cursor), Err(Error::TruncatedBuffer));
    }

    #[test]
    fn legacy_array_header_with_ndims_over_four_is_rejected_not_panicked() {
        let a = seed_scalar_i32();
        let dt = Datatype::compound(4, vec![Member::new("a", 0, a).unwrap()]).unwrap();
        let mut buf = Vec::new();
        encode(&dt, &mut buf, false).unwrap();
        // prelude(8) + name "a" padded to 8 + offset(4) lands on the legacy
        // header's leading `ndims` byte.
        let ndims_at = 8 + 8 + 4;
        assert_eq!(buf[ndims_at], 0);
        buf[ndims_at] = 5;
        let mut cursor: &[u8] = &buf;
        assert_eq!(decode(&mut cursor), Err(Error::OutOfMemory));
    }

    #[test]
    fn use_latest_forces_v3_and_variable_offset_width() {
        let a = seed_scalar_i32();
        let dt = Datatype::compound(4, vec![Member::new("a", 0, a).unwrap()]).unwrap();
        let mut buf = Vec::new();
        encode(&dt, &mut buf, true).unwrap();
        assert_eq!(buf[0] >> 4, Version::V3.to_nibble());
        let mut cursor: &[u8] = &buf;
        let back = decode(&mut cursor).unwrap();
        assert_eq!(back, dt);
    }
}
