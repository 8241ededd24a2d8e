// ── Fixed vocabularies ──
//
// Closed sets every generated record draws from. Tests assert that
// generated values are members of these arrays.

/// AWS account that owns every simulated invocation.
pub const ACCOUNT_ID: &str = "014498666989";

/// Role ARN prefix; the username is appended as the session name.
pub const IDENTITY_ARN_PREFIX: &str =
    "arn:aws:sts::014498666989:assumed-role/AWSReservedSSO_Content_36144823067e6c73/";

pub const MODEL_IDS: [&str; 4] = [
    "arn:aws:bedrock:eu-west-1:014498666989:inference-profile/eu.amazon.nova-lite-v1:0",
    "arn:aws:bedrock:us-east-1:014498666989:inference-profile/us.anthropic.claude-3-5-sonnet-20241022-v2:0",
    "arn:aws:bedrock:us-west-2:014498666989:inference-profile/us.anthropic.claude-3-haiku-20240307-v1:0",
    "arn:aws:bedrock:ap-southeast-1:014498666989:inference-profile/ap.meta.llama3-2-90b-instruct-v1:0",
];

pub const REGIONS: [&str; 4] = ["us-east-1", "eu-west-1", "ap-southeast-1", "us-west-2"];

pub const INFERENCE_REGIONS: [&str; 4] = ["eu-north-1", "us-east-1", "us-west-2", "ap-southeast-2"];

pub const OPERATIONS: [&str; 4] = [
    "Converse",
    "ConverseStream",
    "InvokeModel",
    "InvokeModelWithResponseStream",
];

pub const MAX_TOKEN_BUDGETS: [u32; 4] = [256, 512, 1024, 2048];

pub const PROMPTS: [&str; 10] = [
    "que es aws",
    "explica como funciona amazon ec2",
    "cuales son las mejores practicas de seguridad en la nube",
    "ayudame a crear una funcion lambda",
    "como configurar un bucket de s3",
    "explica los servicios de base de datos de aws",
    "que es amazon bedrock",
    "como implementar ci cd en aws",
    "diferencias entre rds y dynamodb",
    "como usar cloudformation",
];

pub const RESPONSES: [&str; 4] = [
    "AWS es una plataforma de servicios en la nube que ofrece una mezcla de servicios de infraestructura como servicio (IaaS), plataforma como servicio (PaaS) y software como servicio (SaaS). AWS proporciona una amplia gama de servicios que incluyen computación, almacenamiento, bases de datos, redes, seguridad, desarrollo de aplicaciones, gestión de dispositivos móviles, análisis de datos y más.",
    "Amazon EC2 (Elastic Compute Cloud) es un servicio web que proporciona capacidad de cómputo escalable en la nube. Permite a los usuarios alquilar máquinas virtuales en las que pueden ejecutar sus propias aplicaciones.",
    "Las mejores prácticas de seguridad en AWS incluyen: usar IAM para gestión de accesos, habilitar MFA, cifrar datos en tránsito y reposo, usar VPC para aislamiento de red, implementar logging y monitoreo con CloudTrail y CloudWatch.",
    "Para crear una función Lambda: 1) Accede a la consola de AWS Lambda, 2) Haz clic en 'Crear función', 3) Elige el runtime, 4) Escribe tu código, 5) Configura triggers y permisos, 6) Despliega la función.",
];

pub const USERNAMES: [&str; 8] = [
    "Brian", "Alice", "Bob", "Carol", "David", "Eve", "Frank", "Grace",
];

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const STOP_REASON_END_TURN: &str = "end_turn";
pub const SCHEMA_TYPE: &str = "ModelInvocationLog";
pub const SCHEMA_VERSION: &str = "1.0";
