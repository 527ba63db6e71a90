use proptest::prelude::*;
use riff_chunk::{BoundedView, Chunk, ChunkHeader, MemorySource, ReadMode, SharedSource, Tag, TransferOptions, Whence};

fn ascii_tag() -> impl Strategy<Value = Tag> {
    proptest::array::uniform4(0u8..0x80).prop_map(|bytes| Tag::from_bytes(bytes).unwrap())
}

fn mode() -> impl Strategy<Value = ReadMode> {
    prop_oneof![Just(ReadMode::Materialized), Just(ReadMode::Streaming)]
}

proptest! {
    #[test]
    fn header_bytes_decode_back(tag in ascii_tag(), size in any::<u32>()) {
        let header = ChunkHeader::new(tag, size);
        prop_assert_eq!(ChunkHeader::from_bytes(&header.to_bytes()).unwrap(), header);
    }

    #[test]
    fn reads_never_leave_the_window(
        data in proptest::collection::vec(any::<u8>(), 0..64),
        requests in proptest::collection::vec(0usize..80, 1..8),
    ) {
        let mut view = BoundedView::<MemorySource>::from_bytes(data.clone());
        let mut seen = Vec::new();
        for n in requests {
            let before = view.tell();
            let bytes = view.read(n).unwrap();
            prop_assert!(bytes.len() <= n);
            prop_assert_eq!(view.tell(), before + bytes.len() as u64);
            prop_assert!(view.tell() <= view.size());
            seen.extend(bytes);
        }
        prop_assert_eq!(&seen[..], &data[..seen.len()]);
    }

    #[test]
    fn seek_always_lands_inside_the_window(
        len in 0usize..64,
        start in 0i64..64,
        offset in any::<i64>(),
        whence in prop_oneof![Just(Whence::Start), Just(Whence::Current), Just(Whence::End)],
    ) {
        let mut view = BoundedView::<MemorySource>::from_bytes(vec![0u8; len]);
        view.seek(start, Whence::Start).unwrap();
        let landed = view.seek(offset, whence).unwrap();
        prop_assert!(landed <= len as u64);
        prop_assert_eq!(landed, view.tell());
    }

    #[test]
    fn decoded_chunk_encodes_to_its_input(
        tag in ascii_tag(),
        payload in proptest::collection::vec(any::<u8>(), 0..48),
        pad in any::<u8>(),
        mode in mode(),
        buffer_size in 1usize..16,
    ) {
        let mut bytes = ChunkHeader::new(tag, payload.len() as u32).to_bytes().to_vec();
        bytes.extend_from_slice(&payload);
        if payload.len() % 2 == 1 {
            bytes.push(pad);
        }

        let source = SharedSource::from_bytes(bytes.clone());
        let mut chunk = Chunk::decode(&source, mode).unwrap();
        prop_assert_eq!(chunk.header().encoded_len(), bytes.len() as u64);

        let mut out = Vec::new();
        let options = TransferOptions::default().with_buffer_size(buffer_size);
        let written = chunk.encode(&mut out, &options).unwrap();
        prop_assert_eq!(written, bytes.len() as u64);
        prop_assert_eq!(out, bytes);
    }
}
