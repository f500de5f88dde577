//! Free-space search inside a parent block.
//!
//! [`find_free_blocks`] proposes aligned blocks of one requested size.
//! [`find_gaps`] describes all unallocated space as the largest aligned
//! blocks that fit.

use crate::config::FREE_BLOCK_LIMIT;
use crate::models::{get_total_hosts, lo_mask, next_subnet_ipv4, Ipv4, MAX_LENGTH};
use serde::Serialize;
use std::net::Ipv4Addr;

/// Candidate block for a new subnet.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FreeBlock {
    pub cidr: Ipv4,
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
    pub size: u64,
    /// Starts exactly where the previous allocation (or the parent) ends.
    pub contiguous: bool,
}

impl FreeBlock {
    fn at(start: u64, prefix: u8, cursor: u64) -> FreeBlock {
        let size = get_total_hosts(prefix);
        FreeBlock {
            cidr: Ipv4 {
                addr: Ipv4Addr::from(start as u32),
                mask: prefix,
            },
            start: Ipv4Addr::from(start as u32),
            end: Ipv4Addr::from((start + size - 1) as u32),
            size,
            contiguous: start == cursor,
        }
    }
}

fn align_up(ip: u64, block_size: u64) -> u64 {
    ip.div_ceil(block_size) * block_size
}

/// Aligned `/requested_prefix` blocks inside `parent` that overlap nothing in
/// `allocated`, in ascending order, at most `limit` of them.
///
/// Single left-to-right sweep over the allocations sorted by start. A block
/// is only proposed at an alignment boundary at or after the sweep cursor,
/// so space in front of a misaligned remainder is not revisited.
///
/// # Arguments
/// * `parent` - The VPC or parent block
/// * `allocated` - Blocks already in use, in any order, may overlap each other
/// * `requested_prefix` - Size of the wanted block
/// * `limit` - Maximum number of candidates
pub fn find_free_blocks(
    parent: Ipv4,
    allocated: &[Ipv4],
    requested_prefix: u8,
    limit: usize,
) -> Vec<FreeBlock> {
    let mut blocks = Vec::new();
    if requested_prefix < parent.mask || requested_prefix > MAX_LENGTH || limit == 0 {
        return blocks;
    }

    let (parent_start, parent_end) = parent.range();
    let parent_end = u64::from(parent_end);
    let block_size = get_total_hosts(requested_prefix);

    let mut ranges: Vec<(u64, u64)> = allocated
        .iter()
        .map(|b| {
            let (start, end) = b.range();
            (u64::from(start), u64::from(end))
        })
        .collect();
    ranges.sort_unstable();

    let mut cursor = u64::from(parent_start);
    // the trailing sentinel sweeps the space after the last allocation
    for (start, end) in ranges.into_iter().chain(std::iter::once((parent_end + 1, parent_end))) {
        let mut aligned = align_up(cursor, block_size);
        while aligned + block_size - 1 < start && aligned + block_size - 1 <= parent_end {
            blocks.push(FreeBlock::at(aligned, requested_prefix, cursor));
            if blocks.len() >= limit {
                return blocks;
            }
            aligned += block_size;
        }
        // nested allocations must not move the cursor backwards
        cursor = cursor.max(end + 1);
    }
    log::debug!(
        "find_free_blocks({parent}, /{requested_prefix}) found {}",
        blocks.len()
    );
    blocks
}

/// [`find_free_blocks`] with the default result limit.
pub fn find_free_blocks_default(
    parent: Ipv4,
    allocated: &[Ipv4],
    requested_prefix: u8,
) -> Vec<FreeBlock> {
    find_free_blocks(parent, allocated, requested_prefix, FREE_BLOCK_LIMIT)
}

/// Find the biggest subnet that starts at `start_ip` and ends before `limit`.
///
/// The returned mask is constrained by:
/// 1. The `start_mask` parameter (won't return a smaller mask)
/// 2. The IP alignment - `start_ip` must be a valid network address for the mask
/// 3. The subnet must end before `limit` (exclusive)
fn find_biggest_subnet(start_ip: Ipv4Addr, start_mask: u8, limit: u64) -> u8 {
    let mut next_mask = start_mask.max(lo_mask(start_ip));
    while next_mask < MAX_LENGTH {
        let next_subnet = Ipv4 {
            addr: start_ip,
            mask: next_mask,
        };
        if u64::from(u32::from(next_subnet.hi())) >= limit {
            next_mask += 1;
        } else {
            break;
        }
    }
    next_mask
}

/// Every unallocated range of `parent` split into the largest aligned blocks.
pub fn find_gaps(parent: Ipv4, allocated: &[Ipv4]) -> Vec<Ipv4> {
    let parent = parent.network();
    let (parent_start, parent_end) = parent.range();
    let parent_end = u64::from(parent_end);

    let mut inside: Vec<Ipv4> = allocated
        .iter()
        .map(|b| b.network())
        .filter(|b| parent.overlaps(b))
        .collect();
    inside.sort();

    let mut gaps = Vec::new();
    let mut next_ip = u64::from(parent_start);
    let limits = inside
        .iter()
        .map(|b| {
            let (start, end) = b.range();
            (u64::from(start), u64::from(end) + 1)
        })
        .chain(std::iter::once((parent_end + 1, parent_end + 1)));

    for (limit, after) in limits {
        while next_ip < limit {
            let start_ip = Ipv4Addr::from(next_ip as u32);
            let gap = Ipv4 {
                addr: start_ip,
                mask: find_biggest_subnet(start_ip, parent.mask, limit),
            };
            gaps.push(gap);
            match next_subnet_ipv4(gap, None) {
                Ok(next) => next_ip = u64::from(u32::from(next.addr)),
                // gap ran to the end of the address space
                Err(_) => return gaps,
            }
        }
        next_ip = next_ip.max(after);
    }
    gaps
}
