//! Header byte layout.
//!
//! Every record starts with a single header byte. The three high bits are the [`Kind`], the
//! five low bits ("data5") carry a kind-specific field:
//!
//! ```text
//!  7 6 5 4 3 2 1 0
//! [kind ][  data5  ]
//! ```
//!
//! Lengths and codes are 13 bits wide: the five high bits live in data5, the eight low bits
//! in the byte right after the header.

/// 0xe0
pub const MASK_KIND: u8 = 0b1110_0000;
/// 0x1f
pub const MASK_DATA: u8 = 0b0001_1111;

/// Boolean value bit.
pub const BOOL_TRUE: u8 = 0b0000_0001;
/// Integer sign bit, 0x10
pub const INT_NEGATIVE: u8 = 0b0001_0000;
/// Integer width bits, 0x0f
pub const MASK_INT_WIDTH: u8 = 0b0000_1111;
/// Float decimal-hint bits, 0x0f
pub const MASK_DECIMALS: u8 = 0b0000_1111;
/// Container is an object, 0x10
pub const CONT_OBJ: u8 = 0b0001_0000;
/// Container opens, 0x08
pub const CONT_OPEN: u8 = 0b0000_1000;

/// Largest length (or code) a record can carry.
pub const MAX_LEN: usize = 0b0001_1111_1111_1111;
/// Largest integer magnitude width, in bytes.
pub const MAX_INT_WIDTH: u8 = 8;
/// Size of a float payload.
pub const FLOAT_SIZE: usize = 4;
/// Decimal hint used when none is given.
pub const DEFAULT_DECIMALS: u8 = 4;

/// Record kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    /// Length-prefixed bytes, rendered as text.
    String = 0,
    /// `true` or `false`.
    Boolean = 1,
    /// Sign and minimal-width magnitude.
    Integer = 2,
    /// Single precision float with a decimal hint.
    Float = 3,
    /// 13-bit numeric code.
    Code = 4,
    /// Length-prefixed opaque bytes.
    Binary = 5,
    /// Object or array bracket.
    Container = 6,
    /// Null.
    Null = 7,
}

impl Kind {
    /// Reads the kind from the three high bits of `header`.
    pub const fn from_bits(header: u8) -> Kind {
        match header >> 5 {
            0 => Kind::String,
            1 => Kind::Boolean,
            2 => Kind::Integer,
            3 => Kind::Float,
            4 => Kind::Code,
            5 => Kind::Binary,
            6 => Kind::Container,
            _ => Kind::Null,
        }
    }

    /// The kind in header position.
    pub const fn bits(self) -> u8 { (self as u8) << 5 }

    /// Whether a record of this kind carries a 13-bit length or code after the header.
    pub const fn has_u13(self) -> bool {
        matches!(self, Kind::String | Kind::Code | Kind::Binary)
    }
}

/// Splits a header byte into its kind and data5.
pub const fn split_header(header: u8) -> (Kind, u8) {
    (Kind::from_bits(header), header & MASK_DATA)
}

/// Joins a kind and data5 into a header byte. Bits of `data` above data5 are dropped.
pub const fn join_header(kind: Kind, data: u8) -> u8 { kind.bits() | (data & MASK_DATA) }

/// Splits a 13-bit value into the five high bits and the low byte.
pub const fn split_u13(v: u16) -> (u8, u8) {
    (((v >> 8) as u8) & MASK_DATA, (v & 0xff) as u8)
}

/// Inverse of [`split_u13`].
pub const fn join_u13(msb5: u8, lsb: u8) -> u16 { (((msb5 & MASK_DATA) as u16) << 8) | lsb as u16 }

/// The number of bytes needed for the magnitude `mag`. Zero needs none.
///
/// # Example
///
/// ```
/// use tbson::encoding::tag::minimal_width;
///
/// assert_eq!(minimal_width(0), 0);
/// assert_eq!(minimal_width(255), 1);
/// assert_eq!(minimal_width(256), 2);
/// ```
pub const fn minimal_width(mag: u64) -> u8 { 8 - (mag.leading_zeros() / 8) as u8 }

/// Data5 of an integer record.
pub const fn int_data(negative: bool, width: u8) -> u8 {
    let sign = if negative { INT_NEGATIVE } else { 0 };
    sign | (width & MASK_INT_WIDTH)
}

/// The four container markers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    /// `[`
    ArrOpen,
    /// `]`
    ArrClose,
    /// `{`
    ObjOpen,
    /// `}`
    ObjClose,
}

impl Container {
    /// Data5 of the marker.
    pub const fn data(self) -> u8 {
        match self {
            Container::ArrOpen => CONT_OPEN,
            Container::ArrClose => 0,
            Container::ObjOpen => CONT_OBJ | CONT_OPEN,
            Container::ObjClose => CONT_OBJ,
        }
    }

    /// The full header byte of the marker.
    pub const fn header(self) -> u8 { join_header(Kind::Container, self.data()) }

    /// Reads a marker from data5. Bits other than the object and open bits are ignored.
    pub const fn from_data(data: u8) -> Container {
        match (data & CONT_OBJ != 0, data & CONT_OPEN != 0) {
            (false, true) => Container::ArrOpen,
            (false, false) => Container::ArrClose,
            (true, true) => Container::ObjOpen,
            (true, false) => Container::ObjClose,
        }
    }

    /// The bracket character of the marker.
    pub const fn to_char(self) -> char {
        match self {
            Container::ArrOpen => '[',
            Container::ArrClose => ']',
            Container::ObjOpen => '{',
            Container::ObjClose => '}',
        }
    }

    /// Reads a marker from its bracket character.
    pub const fn from_char(c: char) -> Option<Container> {
        match c {
            '[' => Some(Container::ArrOpen),
            ']' => Some(Container::ArrClose),
            '{' => Some(Container::ObjOpen),
            '}' => Some(Container::ObjClose),
            _ => None,
        }
    }

    pub const fn is_open(self) -> bool { self.data() & CONT_OPEN != 0 }

    pub const fn is_object(self) -> bool { self.data() & CONT_OBJ != 0 }

    /// The marker closing this one, or itself if it already closes.
    pub const fn closing(self) -> Container {
        match self {
            Container::ArrOpen | Container::ArrClose => Container::ArrClose,
            Container::ObjOpen | Container::ObjClose => Container::ObjClose,
        }
    }
}
