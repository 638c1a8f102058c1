#[cfg(test)]
mod tests {
    use crate::{
        consts::{HI_GAIN, SYNC_MARKER_LE},
        errors::WarningKind,
        object_types::Record,
        EventIo, IactFile, ObjectType, SimtelFile,
    };
    use std::io::Write;

    /// Little-endian payload builder.
    #[derive(Default)]
    struct Payload(Vec<u8>);

    impl Payload {
        fn new() -> Self {
            Self::default()
        }

        fn i16(mut self, v: i16) -> Self {
            self.0.extend_from_slice(&v.to_le_bytes());
            self
        }

        fn u16(mut self, v: u16) -> Self {
            self.0.extend_from_slice(&v.to_le_bytes());
            self
        }

        fn i32(mut self, v: i32) -> Self {
            self.0.extend_from_slice(&v.to_le_bytes());
            self
        }

        fn f32(mut self, v: f32) -> Self {
            self.0.extend_from_slice(&v.to_le_bytes());
            self
        }

        fn f32s(mut self, n: usize, v: f32) -> Self {
            for _ in 0..n {
                self.0.extend_from_slice(&v.to_le_bytes());
            }
            self
        }

        fn string(mut self, s: &str) -> Self {
            self.0.extend_from_slice(&(s.len() as u16).to_le_bytes());
            self.0.extend_from_slice(s.as_bytes());
            self
        }

        fn build(self) -> Vec<u8> {
            self.0
        }
    }

    fn header_words(
        type_code: u16,
        version: u16,
        id: i32,
        only_sub: bool,
        length: usize,
    ) -> Vec<u8> {
        let w0 = type_code as u32 | (version as u32) << 20;
        let w2 = length as u32 | (only_sub as u32) << 30;
        let mut out = Vec::new();
        out.extend_from_slice(&w0.to_le_bytes());
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&w2.to_le_bytes());
        out
    }

    /// Top-level object: sync marker plus header plus payload.
    fn top(type_code: u16, version: u16, id: i32, only_sub: bool, payload: &[u8]) -> Vec<u8> {
        let mut out = SYNC_MARKER_LE.to_vec();
        out.extend_from_slice(&header_words(type_code, version, id, only_sub, payload.len()));
        out.extend_from_slice(payload);
        out
    }

    /// Sub-object: header plus payload, no sync marker.
    fn sub(type_code: u16, version: u16, id: i32, payload: &[u8]) -> Vec<u8> {
        let mut out = header_words(type_code, version, id, false, payload.len());
        out.extend_from_slice(payload);
        out
    }

    fn corsika_block(n: usize, fill: &[(usize, f32)]) -> Vec<u8> {
        let mut block = vec![0.0f32; n];
        for (index, value) in fill {
            block[*index] = *value;
        }
        let mut p = Payload::new().i32(n as i32);
        for v in block {
            p = p.f32(v);
        }
        p.build()
    }

    /// Compact photon-bunch payload: 382 bunches of one photon each.
    fn photon_payload(n_bunches: usize) -> Vec<u8> {
        let mut p = Payload::new()
            .i16(0) // array
            .i16(0) // telescope
            .f32(n_bunches as f32) // total photons
            .i32(n_bunches as i32);
        for i in 0..n_bunches {
            p = p
                .i16((i % 100) as i16) // x
                .i16(-(i as i16 % 50)) // y
                .i16(0) // cx
                .i16(0) // cy
                .i16(i as i16 % 1000) // time
                .i16(4000) // zem
                .i16(100) // photons = 1.0
                .i16(400); // wavelength
        }
        p.build()
    }

    /// A file with the one_shower.dat object sequence.
    fn one_shower_stream() -> Vec<u8> {
        let n_bunches = 382;
        let mut data = Vec::new();
        data.extend(top(1200, 0, 0, false, &corsika_block(273, &[(1, 1.0)])));
        data.extend(top(1212, 0, 0, false, b"TELESCOPE 0. 0. 250. 1250.\n"));
        data.extend(top(
            1201,
            0,
            0,
            false,
            &Payload::new()
                .i32(1)
                .f32(0.0)
                .f32(0.0)
                .f32(250.0)
                .f32(1250.0)
                .build(),
        ));
        data.extend(top(1202, 0, 1, false, &corsika_block(273, &[(1, 1.0), (3, 500.0)])));
        data.extend(top(
            1203,
            0,
            1,
            false,
            &Payload::new().i32(1).f32(0.0).f32(120.0).f32(-45.0).build(),
        ));
        let bunches = sub(1205, 1001, 0, &photon_payload(n_bunches));
        data.extend(top(1204, 0, 0, true, &bunches));
        data.extend(top(
            1209,
            0,
            1,
            false,
            &corsika_block(273, &[(1, 1.0), (2, n_bunches as f32)]),
        ));
        data.extend(top(1210, 0, 0, false, &corsika_block(3, &[(1, 1.0), (2, 1.0)])));
        data
    }

    #[test]
    fn one_shower_structure() {
        let mut file = EventIo::from_bytes(one_shower_stream());
        let mut types = Vec::new();
        let mut photon_objects = Vec::new();
        while let Some(object) = file.next_object() {
            let object = object.unwrap();
            types.push(object.header().type_code());
            if object.header().type_code() == 1204 {
                assert_eq!(object.header().length(), 6136);
                let subs: Vec<_> = object.sub_objects().map(|s| s.unwrap()).collect();
                assert_eq!(subs.len(), 1);
                assert_eq!(subs[0].header().type_code(), 1205);
                assert_eq!(subs[0].header().length(), 6124);
                photon_objects.push(subs[0].payload().len());
            }
        }
        assert_eq!(
            types,
            vec![1200, 1212, 1201, 1202, 1203, 1204, 1209, 1210]
        );
        assert_eq!(photon_objects, vec![6124]);
        assert!(file.warnings().is_empty());
    }

    #[test]
    fn one_shower_photon_columns() {
        let mut iact = IactFile::from_bytes(one_shower_stream());
        let event = iact.next_event().unwrap().unwrap();
        assert!(iact.next_event().is_none());

        let telescopes = event.telescopes();
        assert_eq!(telescopes.len(), 1);
        let bunches = &telescopes[0];
        assert_eq!(bunches.len(), 382);
        assert_eq!(bunches.x.len(), 382);

        // per-bunch photons sum to the recorded total, and to the
        // event end block's photon count
        let sum = bunches.photon_sum();
        assert!((sum - bunches.n_photons as f64).abs() <= 1.0);
        assert!((sum - event.end_block.n_photons().unwrap() as f64).abs() <= 1.0);

        assert!(iact.run_header().is_some());
        assert!(iact.input_card().is_some());
        assert!(iact.telescope_definition().is_some());
        assert!(iact.run_end().is_some());
    }

    #[test]
    fn framing_offsets_are_exact() {
        let mut file = EventIo::from_bytes(one_shower_stream());
        let mut expected_offset = 0u64;
        while let Some(header) = file.next_header() {
            let header = header.unwrap();
            // top-level span = 4 (sync) + 12 (header) + length
            assert_eq!(header.offset(), expected_offset + 4);
            assert_eq!(header.data_offset(), header.offset() + header.header_size());
            expected_offset = header.end();
        }
        assert_eq!(expected_offset, one_shower_stream().len() as u64);
    }

    #[test]
    fn decoded_records_and_dispatch() {
        let mut file = EventIo::from_bytes(one_shower_stream());
        let mut names = Vec::new();
        while let Some(result) = file.next_record() {
            let (header, record) = result.unwrap();
            assert_eq!(
                ObjectType::from_code(header.type_code()).code(),
                header.type_code()
            );
            names.push(record.object_type().to_string());
        }
        assert_eq!(
            names,
            vec![
                "CorsikaRunHeader",
                "InputCard",
                "TelescopeDefinition",
                "CorsikaEventHeader",
                "ArrayOffsets",
                "TelescopeData",
                "EventEnd",
                "RunEnd"
            ]
        );
    }

    #[test]
    fn truncated_file_ends_cleanly() {
        let mut data = one_shower_stream();
        // keep the first two objects, then 3 bytes into the next header
        let second_end = {
            let mut file = EventIo::from_bytes(data.clone());
            let mut ends = Vec::new();
            while let Some(header) = file.next_header() {
                ends.push(header.unwrap().end());
            }
            ends[1]
        };
        data.truncate(second_end as usize + 7); // marker + 3 header bytes

        let mut file = EventIo::from_bytes(data);
        let mut count = 0;
        while let Some(object) = file.next_object() {
            object.unwrap();
            count += 1;
        }
        assert_eq!(count, 2);
        let warnings = file.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Truncated);
    }

    #[test]
    fn declared_length_beyond_eof_is_truncation() {
        let mut data = top(1212, 0, 0, false, b"steering text");
        data.truncate(data.len() - 4);
        let mut file = EventIo::from_bytes(data);
        assert!(file.next_object().is_none());
        assert_eq!(file.warnings().len(), 1);
    }

    #[test]
    fn unknown_type_is_opaque() {
        let mut data = top(4242, 1, 7, false, &[1, 2, 3, 4]);
        data.extend(top(1210, 0, 0, false, &corsika_block(3, &[])));
        let mut file = EventIo::from_bytes(data);

        let (_, record) = file.next_record().unwrap().unwrap();
        match record {
            Record::Unknown(unknown) => {
                assert_eq!(unknown.type_code, 4242);
                assert_eq!(unknown.data, vec![1, 2, 3, 4]);
            }
            other => panic!("expected unknown record, got {}", other.object_type()),
        }
        // iteration walks past the unknown object
        let (header, _) = file.next_record().unwrap().unwrap();
        assert_eq!(header.type_code(), 1210);
        assert!(file
            .warnings()
            .iter()
            .any(|w| matches!(w.kind, WarningKind::UnknownType { type_code: 4242 })));
    }

    #[test]
    fn length_mismatch_is_reconciled() {
        // InputCard consumes everything, so pad a scalar object type
        // instead: telescope definition with trailing junk
        let mut payload = Payload::new()
            .i32(1)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .f32(10.0)
            .build();
        payload.extend_from_slice(&[0u8; 6]);
        let data = top(1201, 0, 0, false, &payload);
        let mut file = EventIo::from_bytes(data);
        let (_, record) = file.next_record().unwrap().unwrap();
        assert!(matches!(record, Record::TelescopeDefinition(_)));
        assert!(file
            .warnings()
            .iter()
            .any(|w| matches!(w.kind, WarningKind::LengthMismatch { .. })));
    }

    fn simtel_run_header_payload(tel_ids: &[i16]) -> Vec<u8> {
        let mut p = Payload::new()
            .i32(4000) // run
            .i32(1_500_000_000) // time
            .i32(0) // run_type
            .i32(0) // tracking_mode
            .i32(0) // reverse_flag (v2)
            .f32(0.0)
            .f32(1.2) // direction
            .f32(0.0)
            .f32(0.0) // offset_fov
            .f32(0.0) // conv_depth
            .f32(0.0)
            .f32(0.0) // conv_ref_pos
            .i32(tel_ids.len() as i32);
        for id in tel_ids {
            p = p.i16(*id);
        }
        for _ in tel_ids {
            p = p.f32(0.0).f32(0.0).f32(15.0);
        }
        p.i32(1) // min_tel_trig
            .i32(0) // duration
            .string("Crab")
            .string("ops")
            .build()
    }

    #[test]
    fn telescope_lookup_population() {
        let data = top(2000, 2, 4000, false, &simtel_run_header_payload(&[1, 3, 7]));
        let mut file = EventIo::from_bytes(data);
        let (_, record) = file.next_record().unwrap().unwrap();
        assert!(matches!(record, Record::RunHeader(_)));

        let lookup = file.telescope_lookup().unwrap();
        assert_eq!(lookup.find_index(3), Some(1));
        assert_eq!(lookup.find_index(4), None);
        assert_eq!(lookup.len(), 3);
    }

    fn camera_settings_payload(n_pixels: usize) -> Vec<u8> {
        let mut p = Payload::new().i32(n_pixels as i32).f32(16.0);
        p = p.f32s(n_pixels, 0.1); // pixel_x
        p = p.f32s(n_pixels, -0.1); // pixel_y
        p.build()
    }

    fn central_event_payload() -> Vec<u8> {
        Payload::new()
            .i32(1) // glob_count
            .i32(100)
            .i32(0) // cpu time
            .i32(100)
            .i32(0) // gps time
            .i32(0b10) // teltrg_pattern
            .i32(0b10) // teldata_pattern
            .i16(1) // n_teltrg
            .i16(0) // slot 0
            .f32(12.5)
            .i16(1) // n_teldata
            .i16(0)
            .build()
    }

    fn tel_event(tel_type: u16) -> Vec<u8> {
        let event_header = sub(
            2011,
            1,
            1,
            &Payload::new()
                .i32(1) // loc_count
                .i32(1) // glob_count
                .i32(100)
                .i32(0)
                .i32(100)
                .i32(0)
                .i16(0) // trg_source, no lists
                .build(),
        );
        let adc = sub(
            2012,
            2,
            0, // zero_sup 0, data_red 0
            &Payload::new()
                .i16(1) // tel_id
                .i32(4) // num_pixels
                .i16(1) // num_gains
                .u16(10)
                .u16(20)
                .u16(30)
                .u16(40)
                .build(),
        );
        let mut body = event_header;
        body.extend(adc);
        top(tel_type, 1, 1, true, &body)
    }

    fn simtel_stream() -> Vec<u8> {
        let mut data = Vec::new();
        let history_body = {
            let mut b = sub(
                71,
                1,
                0,
                &Payload::new().i32(1_500_000_000).string("sim_telarray -c cta.cfg").build(),
            );
            b.extend(sub(
                72,
                1,
                0,
                &Payload::new().i32(1_500_000_000).string("trigger_pixels = 3").build(),
            ));
            b
        };
        data.extend(top(70, 1, 0, true, &history_body));
        data.extend(top(2000, 2, 4000, false, &simtel_run_header_payload(&[1, 2])));
        data.extend(top(2002, 0, 1, false, &camera_settings_payload(4)));
        data.extend(top(2002, 0, 2, false, &camera_settings_payload(4)));
        data.extend(top(
            2020,
            1,
            1, // shower number
            false,
            &Payload::new()
                .i32(1) // primary_id
                .f32(0.5) // energy
                .f32(0.0)
                .f32(1.2)
                .f32(0.0) // depth_start
                .f32(25000.0) // h_first_int
                .f32(300.0) // xmax
                .f32(9000.0)
                .f32(280.0)
                .f32(310.0) // hmax, emax, cmax
                .i16(0) // no profiles
                .build(),
        ));
        data.extend(top(
            2021,
            2,
            1, // event
            false,
            &Payload::new().i32(1).f32(120.0).f32(-45.0).build(),
        ));
        data.extend(top(
            2101, // tracking for telescope 1
            0,
            1,
            false,
            &Payload::new().i16(0x01).f32(0.1).f32(1.2).build(),
        ));
        data.extend(top(2009, 1, 1, false, &central_event_payload()));
        data.extend(tel_event(2201));
        data.extend(top(
            2026,
            1,
            1,
            false,
            &Payload::new()
                .i32(1) // shower_num
                .i32(2) // n_telescopes
                .i32(50)
                .i32(0) // n_pe
                .i32(0)
                .i32(0) // n_pixels
                .f32s(2, 100.0) // photons
                .f32s(2, 60.0) // photons_atm
                .f32s(2, 40.0)
                .f32s(2, 20.0)
                .build(),
        ));
        data
    }

    #[test]
    fn simtel_events_are_assembled() {
        let mut simtel = SimtelFile::from_bytes(simtel_stream());
        let event = simtel.next_event().unwrap().unwrap();
        assert!(simtel.next_event().is_none());

        let shower = event.mc_shower.as_ref().unwrap();
        assert_eq!(shower.shower, 1);
        assert_eq!(shower.energy, 0.5);
        let mc_event = event.mc_event.as_ref().unwrap();
        assert_eq!(mc_event.x_core, 120.0);

        let trigger = event.trigger.as_ref().unwrap();
        assert_eq!(trigger.teltrg_list, vec![0]);

        assert_eq!(event.telescope_events.len(), 1);
        let tel = &event.telescope_events[&1];
        assert_eq!(tel.header.as_ref().unwrap().glob_count, 1);
        let sums = tel.adc_sums.as_ref().unwrap();
        assert_eq!(sums.sums(HI_GAIN), &[10, 20, 30, 40]);

        assert_eq!(event.tracking[&1].raw, Some([0.1, 1.2]));
        assert_eq!(
            event.photoelectron_sums.as_ref().unwrap().n_pe,
            vec![50, 0]
        );

        assert_eq!(simtel.telescope_descriptions().len(), 2);
        assert_eq!(simtel.history().len(), 1);
        assert_eq!(simtel.history()[0].command_lines.len(), 1);
        assert_eq!(simtel.history()[0].config_lines.len(), 1);
        let run_header = simtel.run_header().unwrap();
        assert_eq!(run_header.run, 4000);
        assert_eq!(run_header.target.as_deref(), Some("Crab"));
    }

    #[test]
    fn type_version_frequency() {
        let mut file = EventIo::from_bytes(simtel_stream());
        let mut counts = std::collections::HashMap::new();
        while let Some(header) = file.next_header() {
            let header = header.unwrap();
            *counts
                .entry((header.type_code(), header.version()))
                .or_insert(0usize) += 1;
        }
        assert_eq!(counts[&(70, 1)], 1);
        assert_eq!(counts[&(2000, 2)], 1);
        assert_eq!(counts[&(2002, 0)], 2);
        assert_eq!(counts[&(2026, 1)], 1);
    }

    #[test]
    fn big_endian_files_decode() {
        // same header words and payload scalars, byte-reversed
        let mut data = Vec::new();
        data.extend_from_slice(&[0xD4, 0x1F, 0x8A, 0x37]);
        let w0 = 1201_u32;
        let w2 = 20_u32;
        data.extend_from_slice(&w0.to_be_bytes());
        data.extend_from_slice(&0_i32.to_be_bytes());
        data.extend_from_slice(&w2.to_be_bytes());
        data.extend_from_slice(&1_i32.to_be_bytes());
        for v in [5.0f32, 6.0, 7.0, 8.0] {
            data.extend_from_slice(&v.to_be_bytes());
        }

        let mut file = EventIo::from_bytes(data);
        let (_, record) = file.next_record().unwrap().unwrap();
        match record {
            Record::TelescopeDefinition(def) => {
                assert_eq!(def.n_telescopes, 1);
                assert_eq!(def.x, vec![5.0]);
                assert_eq!(def.r, vec![8.0]);
            }
            other => panic!("unexpected record {}", other.object_type()),
        }
        assert_eq!(file.endianness(), Some(binrw::Endian::Big));
    }

    #[test]
    fn rewind_and_random_access() {
        let mut file = EventIo::from_bytes(one_shower_stream());
        assert!(file.is_seekable());
        let first = file.next_header().unwrap().unwrap();
        let _ = file.next_header().unwrap().unwrap();
        let payload = file.read_payload(&first).unwrap();
        assert_eq!(payload.len(), first.length() as usize);
        // read_payload preserves iteration position
        let third = file.next_header().unwrap().unwrap();
        assert_eq!(third.type_code(), 1201);
        file.rewind().unwrap();
        let again = file.next_header().unwrap().unwrap();
        assert_eq!(again.type_code(), first.type_code());
    }

    #[test]
    fn gzip_source_round_trip() {
        let raw = one_shower_stream();
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&raw).unwrap();
        let compressed = encoder.finish().unwrap();

        let path = std::env::temp_dir().join("eventio_test_one_shower.dat.gz");
        std::fs::write(&path, compressed).unwrap();

        let mut file = EventIo::new(&path).unwrap();
        assert!(!file.is_seekable());
        let mut types = Vec::new();
        while let Some(object) = file.next_object() {
            types.push(object.unwrap().header().type_code());
        }
        assert_eq!(
            types,
            vec![1200, 1212, 1201, 1202, 1203, 1204, 1209, 1210]
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn zstd_source_round_trip() {
        let raw = one_shower_stream();
        let compressed = zstd::encode_all(raw.as_slice(), 0).unwrap();
        let path = std::env::temp_dir().join("eventio_test_one_shower.dat.zst");
        std::fs::write(&path, compressed).unwrap();

        let mut file = EventIo::new(&path).unwrap();
        assert!(!file.is_seekable());
        assert_eq!(file.headers().filter_map(|h| h.ok()).count(), 8);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn extended_headers_parse() {
        // extension word with zero high bits: same length, 16-byte header
        let payload = b"abcd";
        let mut data = SYNC_MARKER_LE.to_vec();
        let w0 = 1212_u32 | 1 << 17; // extended bit
        data.extend_from_slice(&w0.to_le_bytes());
        data.extend_from_slice(&0_i32.to_le_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&0_u32.to_le_bytes()); // extension
        data.extend_from_slice(payload);

        let mut file = EventIo::from_bytes(data.clone());
        let header = file.next_header().unwrap().unwrap();
        assert!(header.extended());
        assert_eq!(header.header_size(), 16);
        assert_eq!(header.length(), 4);
        assert_eq!(header.end(), data.len() as u64);
        assert!(file.next_header().is_none());
    }
}
