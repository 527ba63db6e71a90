use riff_chunk::{
    Chunk, MemorySource, ReadMode, RiffChunk, RiffError, SharedSource, Source, Subchunks, Tag, TransferOptions,
};

const MODES: [ReadMode; 2] = [ReadMode::Materialized, ReadMode::Streaming];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn two_chunk_container() -> Vec<u8> {
    let mut bytes = b"RIFF\x1c\x00\x00\x00MOCK".to_vec();
    bytes.extend_from_slice(b"CNKA\x04\x00\x00\x00AAAA");
    bytes.extend_from_slice(b"CNKB\x04\x00\x00\x00BBBB");
    bytes
}

fn decode(bytes: Vec<u8>, mode: ReadMode) -> riff_chunk::Result<RiffChunk<MemorySource>> {
    let source = SharedSource::from_bytes(bytes);
    RiffChunk::decode(&source, mode)
}

#[test]
fn decodes_form_type_and_subchunks_in_order() {
    init_logging();
    for mode in MODES {
        let mut riff = decode(two_chunk_container(), mode).unwrap();
        assert_eq!(riff.size(), 28);
        assert_eq!(riff.form_type(), "MOCK");
        assert_eq!(riff.subchunks().len(), 2);

        let expected: [(&str, u32, &[u8]); 2] = [("CNKA", 4, b"AAAA"), ("CNKB", 4, b"BBBB")];
        for (chunk, (tag, size, data)) in riff.subchunks_mut().iter_mut().zip(expected) {
            assert_eq!(chunk.tag(), tag);
            assert_eq!(chunk.size(), size);
            assert_eq!(chunk.data_mut().read_all().unwrap(), data);
        }
    }
}

#[test]
fn subchunks_can_be_read_out_of_order() {
    let mut riff = decode(two_chunk_container(), ReadMode::Streaming).unwrap();
    let second = riff.find_mut("CNKB".parse().unwrap()).unwrap();
    assert_eq!(second.data_mut().read_all().unwrap(), b"BBBB");
    let first = riff.find_mut("CNKA".parse().unwrap()).unwrap();
    assert_eq!(first.data_mut().read(2).unwrap(), b"AA");
    assert!(riff.find("NONE".parse().unwrap()).is_none());
}

#[test]
fn wrong_container_tag_fails_before_payload() {
    let mut bytes = two_chunk_container();
    bytes[..4].copy_from_slice(b"LIST");
    for mode in MODES {
        let source = SharedSource::from_bytes(bytes.clone());
        let err = RiffChunk::decode(&source, mode).unwrap_err();
        assert!(matches!(
            err,
            RiffError::TagMismatch { expected: Tag::RIFF, found } if found == "LIST"
        ));
        assert_eq!(source.lock().unwrap().position().unwrap(), 8);
    }
}

#[test]
fn container_too_small_for_form_type() {
    for mode in MODES {
        let err = decode(b"RIFF\x02\x00\x00\x00MO".to_vec(), mode).unwrap_err();
        assert!(matches!(err, RiffError::FormatTruncated), "{:?}", err);
    }
    let err = decode(b"RIFF\x04\x00\x00\x00MO".to_vec(), ReadMode::Streaming).unwrap_err();
    assert!(matches!(err, RiffError::FormatTruncated), "{:?}", err);
}

#[test]
fn non_ascii_form_type_is_rejected() {
    for mode in MODES {
        let err = decode(b"RIFF\x04\x00\x00\x00M\xffCK".to_vec(), mode).unwrap_err();
        assert!(matches!(err, RiffError::FormatNotDecodable(raw) if raw == *b"M\xffCK"));
    }
}

#[test]
fn empty_container_has_no_subchunks() {
    for mode in MODES {
        let riff = decode(b"RIFF\x04\x00\x00\x00MOCK".to_vec(), mode).unwrap();
        assert_eq!(riff.form_type(), "MOCK");
        assert!(riff.subchunks().is_empty());
    }
}

#[test]
fn odd_subchunk_is_followed_by_its_pad() {
    let mut bytes = b"RIFF\x1c\x00\x00\x00MOCK".to_vec();
    bytes.extend_from_slice(b"ODD1\x03\x00\x00\x00abc\x00");
    bytes.extend_from_slice(b"CNKB\x04\x00\x00\x00BBBB");
    for mode in MODES {
        let mut riff = decode(bytes.clone(), mode).unwrap();
        let tags: Vec<String> = riff.iter().map(|chunk| chunk.tag().to_string()).collect();
        assert_eq!(tags, ["ODD1", "CNKB"]);

        let odd = &mut riff.subchunks_mut()[0];
        assert!(odd.padded());
        assert_eq!(odd.data_mut().read_all().unwrap(), b"abc");
        assert_eq!(odd.read_pad().unwrap(), Some(0));
        assert_eq!(riff.subchunks_mut()[1].data_mut().read_all().unwrap(), b"BBBB");
    }
}

#[test]
fn subchunk_overrunning_parent_is_rejected() {
    let mut bytes = b"RIFF\x10\x00\x00\x00MOCK".to_vec();
    bytes.extend_from_slice(b"CNKA\x08\x00\x00\x00AAAAAAAA");
    for mode in MODES {
        let err = decode(bytes.clone(), mode).unwrap_err();
        assert!(
            matches!(err, RiffError::ChunkOverrun { tag, declared: 8, available: 4 } if tag == "CNKA"),
            "{:?}",
            err
        );
    }
}

#[test]
fn trailing_bytes_too_short_for_a_header_are_rejected() {
    let mut bytes = b"RIFF\x0f\x00\x00\x00MOCK".to_vec();
    bytes.extend_from_slice(b"CNKA\x00\x00\x00\x00");
    bytes.extend_from_slice(b"xyz\x00");
    for mode in MODES {
        let err = decode(bytes.clone(), mode).unwrap_err();
        assert!(matches!(err, RiffError::HeaderTruncated { found: 3 }), "{:?}", err);
    }
}

#[test]
fn file_ending_before_declared_container_size() {
    let mut bytes = b"RIFF\x30\x00\x00\x00MOCK".to_vec();
    bytes.extend_from_slice(b"CNKA\x04\x00\x00\x00AAAA");

    let err = decode(bytes.clone(), ReadMode::Streaming).unwrap_err();
    assert!(matches!(err, RiffError::HeaderTruncated { found: 0 }), "{:?}", err);

    let err = decode(bytes, ReadMode::Materialized).unwrap_err();
    assert!(matches!(err, RiffError::DataTruncated { expected: 48, found: 16 }), "{:?}", err);
}

#[test]
fn missing_pad_at_parent_end_surfaces_only_when_consumed() {
    let mut bytes = b"RIFF\x0f\x00\x00\x00MOCK".to_vec();
    bytes.extend_from_slice(b"ODD1\x03\x00\x00\x00abc");
    for mode in MODES {
        let mut riff = decode(bytes.clone(), mode).unwrap();
        let odd = &mut riff.subchunks_mut()[0];
        assert_eq!(odd.data_mut().read_all().unwrap(), b"abc");
        assert!(matches!(odd.read_pad(), Err(RiffError::PadTruncated)));
    }
}

#[test]
fn nested_list_is_returned_as_plain_chunk() {
    let mut bytes = b"RIFF\x24\x00\x00\x00MOCK".to_vec();
    bytes.extend_from_slice(b"LIST\x10\x00\x00\x00INFO");
    bytes.extend_from_slice(b"INAM\x03\x00\x00\x00abc\x00");
    bytes.extend_from_slice(b"CNKB\x00\x00\x00\x00");
    for mode in MODES {
        let riff = decode(bytes.clone(), mode).unwrap();
        let mut subchunks = riff.into_subchunks();
        assert_eq!(subchunks.len(), 2);
        assert_eq!(subchunks[1].tag(), "CNKB");

        let mut list = subchunks.remove(0);
        assert_eq!(list.tag(), Tag::LIST);
        assert_eq!(list.data_mut().read(4).unwrap(), b"INFO");

        let inner: Vec<_> = Subchunks::new(SharedSource::new(list.into_data()), mode)
            .collect::<riff_chunk::Result<_>>()
            .unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].tag(), "INAM");
        assert_eq!(inner[0].size(), 3);
    }
}

#[test]
fn top_level_chunks_iterate_to_clean_end() {
    let mut bytes = b"CNKA\x04\x00\x00\x00AAAA".to_vec();
    bytes.extend_from_slice(b"ODD1\x01\x00\x00\x00z\x00");
    let source = SharedSource::from_bytes(bytes.clone());
    let tags: Vec<Tag> = Subchunks::new(source, ReadMode::Streaming)
        .map(|chunk| chunk.map(|chunk| chunk.tag()))
        .collect::<riff_chunk::Result<_>>()
        .unwrap();
    assert_eq!(tags, ["CNKA".parse::<Tag>().unwrap(), "ODD1".parse().unwrap()]);

    bytes.extend_from_slice(b"CN");
    let source = SharedSource::from_bytes(bytes);
    let mut iter = Subchunks::new(source, ReadMode::Materialized);
    assert!(iter.next().unwrap().is_ok());
    assert!(iter.next().unwrap().is_ok());
    assert!(matches!(iter.next(), Some(Err(RiffError::HeaderTruncated { found: 2 }))));
    assert!(iter.next().is_none());
}

#[test]
fn decoded_container_re_encodes_identically() {
    let small = TransferOptions::default().with_buffer_size(3);
    for mode in MODES {
        let original = two_chunk_container();
        let mut riff = decode(original.clone(), mode).unwrap();
        let mut out = Vec::new();
        let written = riff.encode(&mut out, &small).unwrap();
        assert_eq!(written, out.len() as u64);
        assert_eq!(out, original);
    }
}

#[test]
fn encode_rejects_partially_read_subchunks() {
    let mut riff = decode(two_chunk_container(), ReadMode::Streaming).unwrap();
    riff.subchunks_mut()[1].data_mut().read(1).unwrap();
    let mut out = Vec::new();
    let err = riff.encode(&mut out, &TransferOptions::default()).unwrap_err();
    assert!(matches!(err, RiffError::ChunkPartiallyConsumed { position: 1 }));
    assert!(out.is_empty());
}

#[test]
fn builds_container_from_in_memory_chunks() {
    let subchunks = vec![
        Chunk::from_bytes("fmt ".parse().unwrap(), b"\x01\x00".to_vec()).unwrap(),
        Chunk::from_bytes("data".parse().unwrap(), b"xyz".to_vec()).unwrap(),
    ];
    let mut riff = RiffChunk::<MemorySource>::new("WAVE".parse().unwrap(), subchunks).unwrap();
    assert_eq!(riff.size(), 4 + 10 + 12);

    let mut out = Vec::new();
    riff.encode(&mut out, &TransferOptions::default()).unwrap();

    let mut expected = b"RIFF\x1a\x00\x00\x00WAVE".to_vec();
    expected.extend_from_slice(b"fmt \x02\x00\x00\x00\x01\x00");
    expected.extend_from_slice(b"data\x03\x00\x00\x00xyz\x00");
    assert_eq!(out, expected);

    let decoded = decode(out, ReadMode::Materialized).unwrap();
    assert_eq!(decoded.form_type(), "WAVE");
    assert_eq!(decoded.subchunks().len(), 2);
}

#[test]
fn materialized_container_outlives_its_source() {
    let source = SharedSource::from_bytes(two_chunk_container());
    let mut riff = RiffChunk::decode(&source, ReadMode::Materialized).unwrap();
    drop(source);
    let chunk = riff.find_mut("CNKB".parse().unwrap()).unwrap();
    assert_eq!(chunk.data_mut().read_all().unwrap(), b"BBBB");
}
