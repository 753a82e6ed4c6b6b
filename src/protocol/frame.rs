use heapless::Vec;
use log::trace;
use nom::bytes::streaming::{tag, take};
use nom::combinator::recognize;
use nom::multi::length_data;
use nom::number::streaming::be_u8;
use nom::sequence::tuple;
use nom::IResult;
use thiserror::Error;

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DataType {
    SetRequest = 0x41,
    GetInfoRequest = 0x42,
    ConnectRequest = 0x5a,

    SetResponse = 0x61,
    GetInfoResponse = 0x62,
    ConnectResponse = 0x7a,

    Unknown = 0xff,
}

impl DataType {
    /// Types this side of the link sends.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            DataType::SetRequest | DataType::GetInfoRequest | DataType::ConnectRequest
        )
    }
}

impl From<u8> for DataType {
    fn from(byte: u8) -> Self {
        match byte {
            0x41 => DataType::SetRequest,
            0x42 => DataType::GetInfoRequest,
            0x5a => DataType::ConnectRequest,

            0x61 => DataType::SetResponse,
            0x62 => DataType::GetInfoResponse,
            0x7a => DataType::ConnectResponse,

            _ => DataType::Unknown,
        }
    }
}

pub const FRAME_START: u8 = 0xfc;
const FRAME_B3: u8 = 0x01;
const FRAME_B4: u8 = 0x30;

pub const HEADER_LEN: usize = 5;
pub const MAX_DATA_LEN: usize = u8::MAX as usize;
pub const MAX_FRAME_LEN: usize = HEADER_LEN + MAX_DATA_LEN + 1;

type FrameBuf = Vec<u8, MAX_FRAME_LEN>;

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum FrameError {
    #[error("byte 0x{0:02x} outside of a frame")]
    Desync(u8),
    #[error("invalid checksum: calculated 0x{calculated:02x}, received 0x{received:02x}")]
    ChecksumMismatch { calculated: u8, received: u8 },
    #[error("incomplete frame")]
    IncompleteData(Option<usize>),
    #[error("frame starts with 0x{0:02x}")]
    BadStart(u8),
    #[error("{0} data bytes do not fit in a frame")]
    DataTooLong(usize),
}

/// `0xfc` minus the sum of every byte, modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    FRAME_START.wrapping_sub(sum)
}

/// One validated frame:
///
/// ```text
/// [0xfc][type][0x01][0x30][len][data ... len bytes][checksum]
/// ```
///
/// Two frames are equal when their bytes are.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    bytes: FrameBuf,
}

impl Frame {
    /// Builds a frame around `data`, failing only when it is longer than a
    /// length byte can describe.
    pub fn build(data_type: u8, data: &[u8]) -> Result<Self, FrameError> {
        if data.len() > MAX_DATA_LEN {
            return Err(FrameError::DataTooLong(data.len()));
        }
        Ok(Self::assemble(data_type, data))
    }

    /// Infallible `build` for fixed size data.
    pub fn with_data<const N: usize>(data_type: DataType, data: &[u8; N]) -> Self {
        const { assert!(N <= MAX_DATA_LEN) };
        Self::assemble(data_type as u8, data)
    }

    fn assemble(data_type: u8, data: &[u8]) -> Self {
        let mut bytes = FrameBuf::new();
        // Capacity holds the header, 255 data bytes and the checksum, so
        // none of these can fail once `data` has been length checked.
        let header = [FRAME_START, data_type, FRAME_B3, FRAME_B4, data.len() as u8];
        let _ = bytes.extend_from_slice(&header);
        let _ = bytes.extend_from_slice(data);
        let _ = bytes.push(checksum(&bytes));
        Self { bytes }
    }

    /// Parses one frame from the start of `data`, returning it along with
    /// whatever follows it.
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), FrameError> {
        match frame_parts(data) {
            Ok((remaining_data, (body, received))) => {
                let calculated = checksum(body);
                if calculated != received {
                    return Err(FrameError::ChecksumMismatch { calculated, received });
                }
                let bytes = FrameBuf::from_slice(&data[..body.len() + 1])
                    .map_err(|_| FrameError::DataTooLong(body.len() - HEADER_LEN))?;
                Ok((Self { bytes }, remaining_data))
            }

            Err(nom::Err::Incomplete(needed)) => match needed {
                nom::Needed::Size(size) => Err(FrameError::IncompleteData(Some(size.get()))),
                nom::Needed::Unknown => Err(FrameError::IncompleteData(None)),
            },

            Err(nom::Err::Error(_)) | Err(nom::Err::Failure(_)) => {
                Err(FrameError::BadStart(data.first().copied().unwrap_or_default()))
            }
        }
    }

    pub fn data_type(&self) -> DataType {
        DataType::from(self.type_byte())
    }

    pub fn type_byte(&self) -> u8 {
        self.bytes[1]
    }

    pub fn data_len(&self) -> usize {
        self.bytes[HEADER_LEN - 1] as usize
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..self.bytes.len() - 1]
    }

    pub fn checksum(&self) -> u8 {
        self.bytes[self.bytes.len() - 1]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// The two extra header bytes are carried but not checked; only the checksum
// decides validity.
fn frame_parts(input: &[u8]) -> IResult<&[u8], (&[u8], u8)> {
    let (input, body) = recognize(tuple((
        tag(&[FRAME_START][..]),
        take(3usize),
        length_data(be_u8),
    )))(input)?;
    let (input, received) = be_u8(input)?;
    Ok((input, (body, received)))
}

/// Rebuilds frames from a byte stream, one byte at a time.
///
/// A start byte always begins a new frame, dropping whatever was collected
/// so far. That is how the assembler falls back into step after noise or a
/// truncated frame.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: FrameBuf,
    in_frame: bool,
    data_len: Option<usize>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one byte. Returns the frame it completed, if any.
    ///
    /// `Desync` is returned for bytes seen while no frame is open, and
    /// `ChecksumMismatch` for a complete frame that fails validation. Both
    /// leave the assembler ready for the next start byte.
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        if byte == FRAME_START {
            if !self.buffer.is_empty() {
                trace!("Dropping partial frame {:02x?}", self.buffer);
            }
            self.reset();
            self.in_frame = true;
        }

        if !self.in_frame {
            return Err(FrameError::Desync(byte));
        }

        if self.buffer.push(byte).is_err() {
            // Only reachable if the length check below was skipped.
            self.reset();
            return Err(FrameError::Desync(byte));
        }

        if self.buffer.len() == HEADER_LEN {
            self.data_len = Some(byte as usize);
        }

        match self.data_len {
            Some(data_len) if self.buffer.len() == HEADER_LEN + data_len + 1 => {
                let result = Frame::parse(&self.buffer).map(|(frame, _)| Some(frame));
                self.reset();
                result
            }
            _ => Ok(None),
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.in_frame = false;
        self.data_len = None;
    }

    /// Whether a frame has been started but not completed.
    pub fn in_progress(&self) -> bool {
        self.in_frame
    }
}
