//! EventIO object: a header plus its payload, either a leaf record
//! or a run of nested sub-objects.

use binrw::Endian;

use crate::{
    consts::MAX_NESTING_DEPTH,
    cursor::PayloadCursor,
    EventioError,
};

use super::ObjectHeader;

/// A top-level object with its payload bytes loaded.
#[derive(Debug)]
pub struct Object {
    pub(crate) header: ObjectHeader,
    pub(crate) data: Vec<u8>,
    pub(crate) endian: Endian,
}

impl Object {
    pub fn header(&self) -> &ObjectHeader {
        &self.header
    }

    /// Raw payload, `header.length()` bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    /// Cursor over the payload in the file's byte order.
    pub fn cursor(&self) -> PayloadCursor<'_> {
        PayloadCursor::new(&self.data, self.endian)
    }

    /// Borrowed view, the type sub-object iteration and the decoders
    /// operate on.
    pub fn as_view(&self) -> ObjectView<'_> {
        ObjectView {
            header: self.header.clone(),
            data: &self.data,
            endian: self.endian,
            depth: 0,
        }
    }

    /// Iterates nested sub-objects. Empty unless the header's
    /// `only_sub_objects` bit is set.
    pub fn sub_objects(&self) -> SubObjects<'_> {
        self.as_view().into_sub_objects()
    }
}

/// Borrowed object: header plus a payload slice into the enclosing
/// buffer. Sub-objects at any depth share this type, so no payload
/// bytes are ever copied while walking the tree.
#[derive(Debug, Clone)]
pub struct ObjectView<'a> {
    pub(crate) header: ObjectHeader,
    pub(crate) data: &'a [u8],
    pub(crate) endian: Endian,
    pub(crate) depth: usize,
}

impl<'a> ObjectView<'a> {
    pub fn header(&self) -> &ObjectHeader {
        &self.header
    }

    pub fn payload(&self) -> &'a [u8] {
        self.data
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn cursor(&self) -> PayloadCursor<'a> {
        PayloadCursor::new(self.data, self.endian)
    }

    /// Iterates nested sub-objects, bounded by this object's payload
    /// extent. Sub-object headers carry no sync marker.
    pub fn sub_objects(&self) -> SubObjects<'a> {
        self.clone().into_sub_objects()
    }

    fn into_sub_objects(self) -> SubObjects<'a> {
        let fused = !self.header.only_sub_objects;
        let failed = if self.depth + 1 > MAX_NESTING_DEPTH {
            Some(EventioError::NestingTooDeep {
                depth: self.depth + 1,
            })
        } else {
            None
        };
        SubObjects {
            cur: PayloadCursor::new(self.data, self.endian),
            base: self.header.data_offset,
            endian: self.endian,
            depth: self.depth + 1,
            fused,
            failed,
        }
    }
}

/// Lazy iterator over the sub-objects of one payload. Yields views
/// in file order; terminating early consumes nothing past the last
/// yielded object.
#[derive(Debug)]
pub struct SubObjects<'a> {
    cur: PayloadCursor<'a>,
    base: u64,
    endian: Endian,
    depth: usize,
    fused: bool,
    failed: Option<EventioError>,
}

impl<'a> Iterator for SubObjects<'a> {
    type Item = Result<ObjectView<'a>, EventioError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        if let Some(err) = self.failed.take() {
            self.fused = true;
            return Some(Err(err));
        }
        if self.cur.is_empty() {
            return None;
        }

        let header = match ObjectHeader::parse(&mut self.cur, self.base) {
            Ok(header) => header,
            Err(err) => {
                self.fused = true;
                return Some(Err(err));
            }
        };
        let data = match self.cur.take(header.length as usize) {
            Ok(data) => data,
            Err(_) => {
                self.fused = true;
                return Some(Err(EventioError::MalformedHeader {
                    offset: header.offset,
                    reason: "sub-object length exceeds parent payload",
                }));
            }
        };

        Some(Ok(ObjectView {
            header,
            data,
            endian: self.endian,
            depth: self.depth,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_object(type_code: u16, version: u16, id: i32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&((type_code as u32) | (version as u32) << 20).to_le_bytes());
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn container(type_code: u16, children: &[Vec<u8>]) -> Object {
        let data: Vec<u8> = children.iter().flatten().copied().collect();
        let header = ObjectHeader {
            type_code,
            only_sub_objects: true,
            length: data.len() as u64,
            data_offset: 16,
            ..Default::default()
        };
        Object {
            header,
            data,
            endian: Endian::Little,
        }
    }

    #[test]
    fn iterates_sub_objects_in_order() {
        let obj = container(
            1204,
            &[
                sub_object(1205, 0, 0, &[1, 2, 3, 4]),
                sub_object(1205, 0, 1, &[5, 6]),
            ],
        );
        let subs: Vec<_> = obj.sub_objects().map(|s| s.unwrap()).collect();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].header().type_code(), 1205);
        assert_eq!(subs[0].payload(), &[1, 2, 3, 4]);
        assert_eq!(subs[1].header().id(), 1);
        assert_eq!(subs[1].payload(), &[5, 6]);
        // offsets are relative to the parent payload start
        assert_eq!(subs[0].header().offset(), 16);
        assert_eq!(subs[1].header().offset(), 16 + 12 + 4);
    }

    #[test]
    fn leaf_objects_have_no_sub_objects() {
        let mut obj = container(1205, &[sub_object(1205, 0, 0, &[1])]);
        obj.header.only_sub_objects = false;
        assert_eq!(obj.sub_objects().count(), 0);
    }

    #[test]
    fn oversized_child_is_an_error() {
        let mut child = sub_object(1205, 0, 0, &[1, 2, 3]);
        child.truncate(child.len() - 2); // child payload cut short
        let obj = container(1204, &[child]);
        let results: Vec<_> = obj.sub_objects().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn early_termination_is_clean() {
        let obj = container(
            70,
            &[
                sub_object(71, 1, 0, &[0; 8]),
                sub_object(72, 1, 0, &[0; 8]),
            ],
        );
        let mut iter = obj.sub_objects();
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.header().type_code(), 71);
        drop(iter);
    }
}
