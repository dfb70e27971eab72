#![no_main]

use libfuzzer_sys::fuzz_target;
use mpeg2ts_header::adaptation_field::AdaptationField;
use mpeg2ts_header::packet::Packet;
use mpeg2ts_header::pes::PesHeader;

fuzz_target!(|data: &[u8]| {
    for chunk in data.chunks(Packet::SIZE) {
        if let Ok(pk) = Packet::try_new(chunk) {
            let _ = format!("{:?}", pk);
            if let Some(payload) = pk.payload() {
                if let Ok(header) = PesHeader::from_bytes(payload) {
                    let _ = format!("{:?}", header);
                }
            }
        }
    }
    if let Ok(af) = AdaptationField::parse(data) {
        let _ = af.adaptation_field_extension().map(|e| e.fields().count());
    }
    if let Ok(header) = PesHeader::from_bytes(data) {
        let _ = (header.pts(), header.dts());
    }
});
