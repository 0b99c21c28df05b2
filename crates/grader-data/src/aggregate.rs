//! 카테고리별 부분 결과 병합.

use grader_core::{ExtractedRecord, NOT_AVAILABLE};
use tracing::warn;

use crate::extract::PartialRecord;

/// 부분 결과들을 입력 순서대로 하나의 레코드로 합칩니다.
///
/// - 카테고리가 소유하지 않은 필드의 값은 버립니다.
/// - 이미 확인된 필드를 다른 값으로 덮어쓰려 하면 버리고 먼저 들어온 값을 유지합니다.
/// - 미확인 값은 병합할 것이 없으므로 건너뜁니다.
pub fn aggregate<I>(partials: I) -> ExtractedRecord
where
    I: IntoIterator<Item = PartialRecord>,
{
    let mut record = ExtractedRecord::unresolved();

    for partial in partials {
        let owned = partial.category.fields();

        for (field, value) in partial.values {
            if !owned.contains(&field) {
                warn!(
                    category = partial.category.name(),
                    field = %field,
                    "value outside category ownership dropped"
                );
                continue;
            }
            if value == NOT_AVAILABLE {
                continue;
            }
            if record.is_resolved(field) {
                if record.get(field) != value {
                    warn!(
                        category = partial.category.name(),
                        field = %field,
                        kept = record.get(field),
                        dropped = %value,
                        "conflicting value dropped"
                    );
                }
                continue;
            }
            record.set(field, value);
        }
    }

    record
}
