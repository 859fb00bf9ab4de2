use std::ops::Deref;

use tracing::trace;

use super::RsGenerator;
use crate::common::error::QRResult;
use crate::common::metadata::{ECLevel, Version};

// Block splitting & interleaving
//------------------------------------------------------------------------------

// Splits data codewords into the short blocks followed by the long blocks. Long
// blocks carry one extra data codeword.
pub(crate) fn blockify(data: &[u8], ver: Version, ecl: ECLevel) -> Vec<&[u8]> {
    let num_blocks = ver.num_blocks(ecl);
    let ecc_len = ver.ecc_per_block(ecl);
    let raw_codewords = ver.total_codewords();
    let num_short_blocks = num_blocks - raw_codewords % num_blocks;
    let short_data_len = raw_codewords / num_blocks - ecc_len;

    let total_short = short_data_len * num_short_blocks;
    debug_assert!(
        total_short + (short_data_len + 1) * (num_blocks - num_short_blocks) == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Version {ver}, Ec level {ecl}",
        data.len()
    );

    let mut blocks = Vec::with_capacity(num_blocks);
    blocks.extend(data[..total_short].chunks(short_data_len));
    blocks.extend(data[total_short..].chunks(short_data_len + 1));
    blocks
}

// Column-wise read of the blocks. Shorter blocks are skipped once exhausted.
pub(crate) fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_len = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_len = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_len);
    for i in 0..max_block_len {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

// Appends Reed-Solomon ecc to each data block and interleaves the data columns
// followed by the ecc columns
pub fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: ECLevel) -> QRResult<Vec<u8>> {
    assert_eq!(
        data.len(),
        ver.data_codewords(ecl),
        "Data codeword count mismatch: Version {ver}, Ec level {ecl}"
    );

    let ecc_len = ver.ecc_per_block(ecl);
    let rs = RsGenerator::new(ecc_len)?;

    let data_blocks = blockify(data, ver, ecl);
    let ecc_blocks = data_blocks.iter().map(|b| rs.remainder(b)).collect::<Vec<_>>();
    trace!(blocks = data_blocks.len(), ecc_len, "Computed ecc blocks");

    let mut res = interleave(&data_blocks);
    res.extend(interleave(&ecc_blocks));
    assert_eq!(res.len(), ver.total_codewords(), "Interleaved codeword count mismatch");
    Ok(res)
}

#[cfg(test)]
mod block_tests {
    use test_case::test_case;

    use super::{add_ecc_and_interleave, blockify, interleave};
    use crate::common::ec::RsGenerator;
    use crate::common::metadata::{ECLevel, Version};

    const V5Q_MSG: &[u8] = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                             \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                             \x11\xec\x11\xec";

    const V5Q_ECC: [&[u8]; 4] = [
        b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
        b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
        b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
        b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
    ];

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        let interleaved = interleave(&blocks);
        assert_eq!(interleaved, vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0]);
    }

    #[test]
    fn test_blockify_v5q() {
        let ver = Version::new(5).unwrap();
        let blocks = blockify(V5Q_MSG, ver, ECLevel::Q);
        let lens = blocks.iter().map(|b| b.len()).collect::<Vec<_>>();
        assert_eq!(lens, vec![15, 15, 16, 16]);
        assert_eq!(blocks[0], &V5Q_MSG[..15]);
        assert_eq!(blocks[3], &V5Q_MSG[46..]);
    }

    #[test_case(1, ECLevel::L)]
    #[test_case(5, ECLevel::Q)]
    #[test_case(13, ECLevel::M)]
    #[test_case(40, ECLevel::H)]
    fn test_blockify_lengths(ver: u8, ecl: ECLevel) {
        let ver = Version::new(ver).unwrap();
        let data = vec![0u8; ver.data_codewords(ecl)];
        let blocks = blockify(&data, ver, ecl);
        assert_eq!(blocks.len(), ver.num_blocks(ecl));
        let min = blocks.iter().map(|b| b.len()).min().unwrap();
        let max = blocks.iter().map(|b| b.len()).max().unwrap();
        assert!(max - min <= 1);
        assert!(blocks.windows(2).all(|w| w[0].len() <= w[1].len()));
    }

    #[test]
    fn test_ecc_v1m() {
        let msg = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let res = add_ecc_and_interleave(msg, Version::new(1).unwrap(), ECLevel::M).unwrap();
        assert_eq!(&res[..16], msg);
        assert_eq!(&res[16..], b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17");
    }

    #[test]
    fn test_ecc_v5q() {
        let ver = Version::new(5).unwrap();
        let res = add_ecc_and_interleave(V5Q_MSG, ver, ECLevel::Q).unwrap();
        assert_eq!(res.len(), 134);

        let blocks = blockify(V5Q_MSG, ver, ECLevel::Q);
        assert_eq!(&res[..62], &interleave(&blocks)[..]);
        assert_eq!(&res[..4], &[V5Q_MSG[0], V5Q_MSG[15], V5Q_MSG[30], V5Q_MSG[46]]);
        // Long blocks contribute the last data column alone
        assert_eq!(&res[60..62], &[V5Q_MSG[45], V5Q_MSG[61]]);
        assert_eq!(&res[62..], &interleave(&V5Q_ECC)[..]);

        let rs = RsGenerator::new(18).unwrap();
        for (b, exp) in blocks.iter().zip(V5Q_ECC) {
            assert_eq!(rs.remainder(b), exp);
        }
    }

    #[test]
    #[should_panic]
    fn test_data_len_mismatch() {
        let _ = add_ecc_and_interleave(&[0u8; 18], Version::new(1).unwrap(), ECLevel::L);
    }
}
