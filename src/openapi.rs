use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dto::{ForecastPointDto, HistoricalPointDto, PredictRequest, PredictResponse};
use crate::errors::ErrorBody;
use crate::handlers::status::StatusResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Forecast API",
        description = "Single-series daily forecasting service. Submit a time \
series as parallel `timestamps`/`values` arrays with a `forecast_days` \
horizon and receive point forecasts with uncertainty bands plus the \
historical input echoed back."
    ),
    paths(
        crate::handlers::status::health_check,
        crate::handlers::forecast::predict,
    ),
    components(schemas(
        PredictRequest,
        PredictResponse,
        ForecastPointDto,
        HistoricalPointDto,
        StatusResponse,
        ErrorBody,
    )),
    tags(
        (name = "Status", description = "Service health"),
        (name = "Forecast", description = "Time-series forecasting")
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
