/*!
 * Store Codec
 * Byte-exact encoding of the tree inside the decrypted store
 *
 * # Layout
 * All integers little-endian.
 *
 * ```text
 * [8]  magic "YUNVFS01"
 * [4]  version (u32)
 * node, pre-order:
 *   [4]          type marker (1 = file, 2 = directory, 0 never valid)
 *   [4]          name length n (u32)
 *   [n + 1]      name, NUL-terminated
 *   [8]          size (u64): bytes for files, child count for directories
 *   [8] [8]      mtime, ctime (i64)
 *   file:        [size] contents
 *   directory:   [4] child count (u32), then each child
 * ```
 */

use bytes::{Buf, BufMut};
use std::collections::HashSet;
use tracing::warn;

use crate::core::limits::{
    MAX_DECODE_DEPTH, MAX_NAME_LEN, MIN_ENCODED_NODE_LEN, STORE_MAGIC, STORE_VERSION,
};
use crate::core::time::Timestamp;
use crate::core::{SecureBuffer, VfsConfig, VfsError, VfsResult};
use crate::security::path::{validate_bounds, validate_filename_with_limit};
use crate::vfs::{NodeId, NodeKind, VfsNode, VfsTree, ROOT_NAME};

/// Fixed part of a node header: marker, name length, NUL, size, mtime, ctime
const NODE_HEADER_LEN: usize = 4 + 4 + 1 + 8 + 8 + 8;

/// Exact number of plaintext bytes `encode` produces for `tree`
pub fn encoded_size(tree: &VfsTree) -> usize {
    let mut total = STORE_MAGIC.len() + 4;
    tree.walk(|_, _, node| {
        total += NODE_HEADER_LEN + node.name().len();
        total += match node.data() {
            Some(data) => data.len(),
            None => 4,
        };
    });
    total
}

/// Serialize the whole tree, magic and version included
///
/// The buffer is allocated once at its exact final size and zeroed on drop.
///
/// # Errors
/// `LengthExceeded` or `InvalidInput` when a node could not be read back by
/// `decode` with default limits: a name longer than `MAX_NAME_LEN`, or
/// nesting deeper than `MAX_DECODE_DEPTH`. Nothing is written in that case.
pub fn encode(tree: &VfsTree) -> VfsResult<SecureBuffer> {
    let root = tree.root();
    let mut checked = Ok(());
    tree.walk(|path, id, node| {
        if checked.is_ok() && id != root {
            checked = check_storable(path, node);
        }
    });
    checked?;

    let size = encoded_size(tree);
    let mut buffer = SecureBuffer::try_with_capacity(size)?;
    let out = buffer.as_mut_vec();

    out.put_slice(STORE_MAGIC);
    out.put_u32_le(STORE_VERSION);

    let mut result = Ok(());
    tree.walk(|_, _, node| {
        if result.is_ok() {
            result = encode_node(node, out);
        }
    });
    result?;

    debug_assert_eq!(out.len(), size);
    Ok(buffer)
}

/// Check a non-root node against what the decoder accepts
fn check_storable(path: &str, node: &VfsNode) -> VfsResult<()> {
    validate_filename_with_limit(node.name(), MAX_NAME_LEN)?;
    let depth = path.matches('/').count();
    if depth > MAX_DECODE_DEPTH {
        return Err(VfsError::LengthExceeded(format!(
            "{} nests {} levels, a store holds at most {}",
            path, depth, MAX_DECODE_DEPTH
        )));
    }
    Ok(())
}

fn encode_node(node: &VfsNode, out: &mut Vec<u8>) -> VfsResult<()> {
    let name = node.name().as_bytes();
    let name_len = u32::try_from(name.len())
        .map_err(|_| VfsError::LengthExceeded(format!("node name is {} bytes", name.len())))?;

    out.put_u32_le(node.kind().marker());
    out.put_u32_le(name_len);
    out.put_slice(name);
    out.put_u8(0);
    out.put_u64_le(node.size());
    out.put_i64_le(node.mtime());
    out.put_i64_le(node.ctime());

    match node.data() {
        Some(data) => out.put_slice(data),
        None => {
            let count = u32::try_from(node.size()).map_err(|_| {
                VfsError::LengthExceeded(format!("directory has {} children", node.size()))
            })?;
            out.put_u32_le(count);
        }
    }
    Ok(())
}

/// Bounds-checked little-endian reader
///
/// Every accessor checks the remaining length first, so truncated input
/// surfaces as `CorruptData` instead of a panic inside `bytes`.
struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn need(&self, len: usize, what: &str) -> VfsResult<()> {
        if validate_bounds(0, len, self.buf.remaining()) {
            Ok(())
        } else {
            Err(VfsError::corrupt(format_args!(
                "truncated {}: need {} bytes, {} left",
                what,
                len,
                self.buf.remaining()
            )))
        }
    }

    fn u32(&mut self, what: &str) -> VfsResult<u32> {
        self.need(4, what)?;
        Ok(self.buf.get_u32_le())
    }

    fn u64(&mut self, what: &str) -> VfsResult<u64> {
        self.need(8, what)?;
        Ok(self.buf.get_u64_le())
    }

    fn i64(&mut self, what: &str) -> VfsResult<i64> {
        self.need(8, what)?;
        Ok(self.buf.get_i64_le())
    }

    fn bytes(&mut self, len: usize, what: &str) -> VfsResult<&'a [u8]> {
        self.need(len, what)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    fn remaining(&self) -> usize {
        self.buf.remaining()
    }
}

/// Decoded node header plus, for files, the contents
struct RawNode<'a> {
    kind: NodeKind,
    name: &'a str,
    size: u64,
    mtime: Timestamp,
    ctime: Timestamp,
}

fn read_header<'a>(reader: &mut Reader<'a>) -> VfsResult<RawNode<'a>> {
    let marker = reader.u32("type marker")?;
    let kind = match NodeKind::from_marker(marker) {
        Some(kind) => kind,
        None if marker == 0 => return Err(VfsError::corrupt("absent-node marker in node position")),
        None => return Err(VfsError::corrupt(format_args!("unknown type marker {}", marker))),
    };

    let name_len = reader.u32("name length")? as usize;
    let raw = reader.bytes(name_len.saturating_add(1), "name")?;
    let (name, terminator) = raw.split_at(name_len);
    if terminator != [0] {
        return Err(VfsError::corrupt("name is not NUL-terminated"));
    }
    let name = std::str::from_utf8(name).map_err(|_| VfsError::corrupt("name is not UTF-8"))?;

    Ok(RawNode {
        kind,
        name,
        size: reader.u64("size")?,
        mtime: reader.i64("mtime")?,
        ctime: reader.i64("ctime")?,
    })
}

/// Read a directory's child count and check it can fit in what is left
fn read_child_count(reader: &mut Reader<'_>) -> VfsResult<usize> {
    let count = reader.u32("child count")? as usize;
    if count.saturating_mul(MIN_ENCODED_NODE_LEN) > reader.remaining() {
        return Err(VfsError::corrupt(format_args!(
            "child count {} cannot fit in {} remaining bytes",
            count,
            reader.remaining()
        )));
    }
    Ok(count)
}

struct Frame {
    dir: NodeId,
    remaining: usize,
    depth: usize,
    seen: HashSet<String>,
}

/// Rebuild a tree from plaintext produced by `encode`
///
/// Child order is preserved. The tree's counters are recomputed from what
/// was decoded. Bytes after the root node are ignored.
///
/// # Errors
/// `CorruptData` for a bad magic or version, truncation, unknown markers,
/// invalid or duplicate names, oversized counts, or nesting deeper than
/// `MAX_DECODE_DEPTH`.
pub fn decode(plaintext: &[u8], config: VfsConfig) -> VfsResult<VfsTree> {
    let mut reader = Reader { buf: plaintext };

    let magic = reader.bytes(STORE_MAGIC.len(), "magic")?;
    if magic != STORE_MAGIC {
        return Err(VfsError::corrupt("bad magic (wrong passphrase or not a store)"));
    }
    let version = reader.u32("version")?;
    if version != STORE_VERSION {
        return Err(VfsError::corrupt(format_args!(
            "unsupported store version {} (expected {})",
            version, STORE_VERSION
        )));
    }

    let root = read_header(&mut reader)?;
    if root.kind != NodeKind::Directory || root.name != ROOT_NAME {
        return Err(VfsError::corrupt("root node must be a directory named '/'"));
    }
    let mut tree = VfsTree::with_root(config, root.mtime, root.ctime);
    let mut stack = vec![Frame {
        dir: tree.root(),
        remaining: read_child_count(&mut reader)?,
        depth: 0,
        seen: HashSet::new(),
    }];

    while let Some(frame) = stack.last_mut() {
        if frame.remaining == 0 {
            stack.pop();
            continue;
        }
        frame.remaining -= 1;
        let parent = frame.dir;
        let depth = frame.depth + 1;
        if depth > MAX_DECODE_DEPTH {
            return Err(VfsError::corrupt(format_args!(
                "nesting deeper than {} levels",
                MAX_DECODE_DEPTH
            )));
        }

        let raw = read_header(&mut reader)?;
        validate_filename_with_limit(raw.name, config.max_name_len)
            .map_err(|e| VfsError::corrupt(format_args!("invalid node name: {}", e)))?;
        if !frame.seen.insert(raw.name.to_string()) {
            return Err(VfsError::corrupt(format_args!("duplicate name '{}'", raw.name)));
        }

        let node = match raw.kind {
            NodeKind::File => {
                let len = usize::try_from(raw.size)
                    .map_err(|_| VfsError::corrupt("file size does not fit in memory"))?;
                let data = SecureBuffer::try_from_slice(reader.bytes(len, "file contents")?)?;
                VfsNode::file(raw.name, data, raw.mtime, raw.ctime)
            }
            NodeKind::Directory => VfsNode::directory(raw.name, raw.mtime, raw.ctime),
        };
        let id = tree.alloc(node)?;
        tree.attach_back(parent, id)?;

        if raw.kind == NodeKind::Directory {
            stack.push(Frame {
                dir: id,
                remaining: read_child_count(&mut reader)?,
                depth,
                seen: HashSet::new(),
            });
        }
    }

    if reader.remaining() > 0 {
        warn!(trailing = reader.remaining(), "Ignoring bytes after the root node");
    }
    tree.recompute_counters();
    Ok(tree)
}
