//! Human-readable recursive debug dump.

use core::fmt::{self, Write};

use crate::class::ClassBody;
use crate::datatype::Datatype;

const FIELD_WIDTH: usize = 16;
const INDENT_STEP: usize = 4;

/// Render `tree` to `writer`, each line indented by `indent` spaces.
pub fn dump(tree: &Datatype, writer: &mut dyn Write, indent: usize) -> fmt::Result {
    write_field(writer, indent, "class", tree.class().name())?;
    write_field(writer, indent, "size", &tree.size())?;

    match tree.body() {
        ClassBody::Integer(b) => {
            write_field(writer, indent, "order", &format_args!("{:?}", b.byte_order))?;
            write_field(writer, indent, "precision", &b.precision)?;
            write_field(writer, indent, "offset", &b.bit_offset)?;
            write_field(writer, indent, "lsb_pad", &format_args!("{:?}", b.lsb_pad))?;
            write_field(writer, indent, "msb_pad", &format_args!("{:?}", b.msb_pad))?;
            write_field(writer, indent, "sign", &format_args!("{:?}", b.sign))
        }
        ClassBody::BitField(b) => {
            write_field(writer, indent, "order", &format_args!("{:?}", b.byte_order))?;
            write_field(writer, indent, "precision", &b.precision)?;
            write_field(writer, indent, "offset", &b.bit_offset)
        }
        ClassBody::Float(b) => {
            write_field(writer, indent, "order", &format_args!("{:?}", b.byte_order))?;
            write_field(writer, indent, "precision", &b.precision)?;
            write_field(writer, indent, "offset", &b.bit_offset)?;
            write_field(writer, indent, "norm", &format_args!("{:?}", b.norm))?;
            write_field(writer, indent, "sign_bit_pos", &b.sign_bit_pos)?;
            write_field(writer, indent, "exp_pos", &b.exp_pos)?;
            write_field(writer, indent, "exp_size", &b.exp_size)?;
            write_field(writer, indent, "mantissa_pos", &b.mantissa_pos)?;
            write_field(writer, indent, "mantissa_size", &b.mantissa_size)?;
            write_field(writer, indent, "exp_bias", &b.exponent_bias)
        }
        ClassBody::Time(b) => {
            write_field(writer, indent, "order", &format_args!("{:?}", b.byte_order))?;
            write_field(writer, indent, "precision", &b.precision)
        }
        ClassBody::String(b) => {
            write_field(writer, indent, "padding", &format_args!("{:?}", b.padding))?;
            write_field(writer, indent, "charset", &format_args!("{:?}", b.charset))
        }
        ClassBody::Opaque(b) => write_field(writer, indent, "tag", &b.tag),
        ClassBody::Reference(b) => {
            write_field(writer, indent, "subtype", &format_args!("{:?}", b.subtype))
        }
        ClassBody::Compound(b) => {
            write_field(writer, indent, "packed", &b.is_packed())?;
            for m in &b.members {
                write_field(writer, indent, "member", &m.name)?;
                write_field(writer, indent, "offset", &m.offset)?;
                dump(&m.ty, writer, indent + INDENT_STEP)?;
            }
            Ok(())
        }
        ClassBody::Enum(b) => {
            let parent = tree.parent().expect("enum datatype always has a parent");
            writeln!(writer, "{:indent$}parent:", "", indent = indent)?;
            dump(parent, writer, indent + INDENT_STEP)?;
            for m in &b.members {
                write_field(writer, indent, "member", &m.name)?;
            }
            Ok(())
        }
        ClassBody::Vlen(b) => {
            write_field(writer, indent, "subtype", &format_args!("{:?}", b.subtype))?;
            write_field(writer, indent, "location", &format_args!("{:?}", tree.location()))?;
            let parent = tree.parent().expect("vlen datatype always has a parent");
            writeln!(writer, "{:indent$}base:", "", indent = indent)?;
            dump(parent, writer, indent + INDENT_STEP)
        }
        ClassBody::Array(b) => {
            write_field(writer, indent, "dims", &format_args!("{:?}", b.dims))?;
            let parent = tree.parent().expect("array datatype always has a parent");
            writeln!(writer, "{:indent$}base:", "", indent = indent)?;
            dump(parent, writer, indent + INDENT_STEP)
        }
    }
}

fn write_field(
    writer: &mut dyn Write,
    indent: usize,
    name: &str,
    value: &dyn fmt::Display,
) -> fmt::Result {
    writeln!(
        writer,
        "{:indent$}{:width$} {}",
        "",
        name,
        value,
        indent = indent,
        width = FIELD_WIDTH
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::IntegerBody;
    use alloc::string::String;

    #[test]
    fn dump_contains_class_and_size() {
        let dt = Datatype::integer(4, IntegerBody::default());
        let mut out = String::new();
        dump(&dt, &mut out, 0).unwrap();
        assert!(out.contains("Integer"));
        assert!(out.contains("4"));
    }

    #[test]
    fn dump_recurses_into_compound_members() {
        use crate::class::Member;
        let a = Datatype::integer(4, IntegerBody::default());
        let dt = Datatype::compound(4, alloc::vec![Member::new("a", 0, a).unwrap()]).unwrap();
        let mut out = String::new();
        dump(&dt, &mut out, 0).unwrap();
        assert!(out.contains("Compound"));
        assert!(out.contains('a'));
    }
}
