//! # 팔로워 리포트 CSV 생성
//!
//! `csv` 크레이트로 `Destination,Followers` 헤더와 여행 상품별 한 줄을 씁니다.
//! 쉼표나 따옴표가 들어간 목적지 이름은 자동으로 따옴표 처리됩니다.

use crate::{error::AppError, models::FollowerReportRow};

pub const CSV_FILE_NAME: &str = "vacation-report.csv";

pub fn render_csv(rows: &[FollowerReportRow]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Destination", "Followers"])
        .map_err(csv_error)?;
    for row in rows {
        let count = row.follower_count.to_string();
        writer
            .write_record([row.destination.as_str(), count.as_str()])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV is not UTF-8: {}", e)))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("CSV write failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(destination: &str, followers: i64) -> FollowerReportRow {
        FollowerReportRow {
            vacation_id: uuid::Uuid::now_v7().to_string(),
            destination: destination.to_string(),
            follower_count: followers,
        }
    }

    #[test]
    fn header_only_when_empty() {
        assert_eq!(render_csv(&[]).unwrap(), "Destination,Followers\n");
    }

    #[test]
    fn quotes_destinations_with_commas() {
        let csv = render_csv(&[row("Paris, France", 3), row("Tokyo", 0)]).unwrap();
        assert_eq!(
            csv,
            "Destination,Followers\n\"Paris, France\",3\nTokyo,0\n"
        );
    }
}
