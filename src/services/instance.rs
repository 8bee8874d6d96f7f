//! 프로세스 인스턴스 식별자
//!
//! 수평 확장된 인스턴스들은 카운터를 공유하지 않으므로,
//! 응답에 어떤 인스턴스가 답했는지 표시할 짧은 ID를 만듭니다.

use rand_core::{OsRng, RngCore};

const ID_LEN: usize = 6;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 6자리 base-36 (소문자+숫자) 랜덤 ID를 생성합니다. 예: `"k3f9zq"`
pub fn generate_instance_id() -> String {
    let mut value = OsRng.next_u64();
    (0..ID_LEN)
        .map(|_| {
            let digit = (value % 36) as usize;
            value /= 36;
            char::from(ALPHABET[digit])
        })
        .collect()
}
